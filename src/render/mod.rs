//! Server-Side HTML Renderer
//!
//! The single source of truth for rendering a surface's component set to
//! HTML. Used by both the surface store (live fan-out to viewers) and the
//! web server (pre-rendered page loads).
//!
//! # Design Philosophy
//!
//! Rendering is a pure function of (component set, data model): no state,
//! no I/O, and deterministic output. Components form a flat, id-addressed set;
//! the tree is reconstructed here by following `children` references.
//! Unresolved child ids are silently skipped so controllers can build
//! trees incrementally and out of order. Any failure aborts the entire
//! render: partial markup is never returned.

pub mod binding;
pub mod style;

use std::collections::HashMap;

use serde_json::{json, Map, Value};

use crate::component::{Component, ComponentKind};
use crate::error::RenderError;

use self::binding::{display_string, resolve_binding};
use self::style::{escape_html, set_default, style_string};

/// Shared row styling for list items
const LI_STYLE: &str = "padding:12px 0;border-bottom:1px solid rgba(255,255,255,0.1)";
/// Styling for the final list item (no trailing rule)
const LI_STYLE_LAST: &str = "padding:12px 0;border-bottom:none";

type ComponentIndex<'a> = HashMap<&'a str, &'a Component>;

/// Render a component set to an HTML string with inline styles
///
/// An empty component set renders to an empty string. Otherwise a
/// component with id `"root"` must exist ([`RenderError::MissingRoot`]),
/// and every component reachable from it must have a supported type
/// ([`RenderError::UnknownComponentType`]).
pub fn render_components(
    components: &[Component],
    data_model: &Map<String, Value>,
) -> Result<String, RenderError> {
    if components.is_empty() {
        return Ok(String::new());
    }

    // Index by id; last write wins on duplicate ids.
    let mut index: ComponentIndex<'_> = HashMap::with_capacity(components.len());
    for comp in components {
        if !comp.id.is_empty() {
            index.insert(comp.id.as_str(), comp);
        }
    }

    let root = index.get("root").copied().ok_or(RenderError::MissingRoot)?;
    render_component(root, &index, data_model)
}

/// Render a single component and its children
fn render_component(
    comp: &Component,
    index: &ComponentIndex<'_>,
    data: &Map<String, Value>,
) -> Result<String, RenderError> {
    let kind = ComponentKind::parse(&comp.kind).ok_or_else(|| RenderError::UnknownComponentType {
        id: comp.id.clone(),
        tag: comp.kind.clone(),
    })?;
    let style = comp.style.clone();

    match kind {
        ComponentKind::Column => render_stack(comp, index, data, style, "column"),
        ComponentKind::Row => render_stack(comp, index, data, style, "row"),
        ComponentKind::Grid => render_grid(comp, index, data, style),
        ComponentKind::Box => render_box(comp, index, data, style),
        ComponentKind::Card => render_card(comp, index, data, style),
        ComponentKind::Spacer => Ok(render_spacer(comp, style)),
        ComponentKind::Divider => Ok(render_divider(comp, style)),
        ComponentKind::Text => Ok(render_text(comp, data, style)),
        ComponentKind::Image => Ok(render_image(comp, data, style)),
        ComponentKind::Icon => Ok(render_icon(comp, style)),
        ComponentKind::Avatar => Ok(render_avatar(comp, data, style)),
        ComponentKind::List => render_list(comp, index, data, style),
        ComponentKind::Table => Ok(render_table(comp, data, style)),
        ComponentKind::Progress | ComponentKind::ProgressBar => Ok(render_progress(comp, data, style)),
        ComponentKind::Badge => Ok(render_badge(comp, data, style)),
        ComponentKind::Spinner => Ok(render_spinner(comp, style)),
    }
}

/// Render child components referenced by id, skipping unresolved ids
fn render_children(
    comp: &Component,
    index: &ComponentIndex<'_>,
    data: &Map<String, Value>,
) -> Result<String, RenderError> {
    let mut out = String::new();
    for child_id in &comp.children {
        if let Some(child) = index.get(child_id.as_str()) {
            out.push_str(&render_component(child, index, data)?);
        }
    }
    Ok(out)
}

// --- Layout containers ---

fn render_stack(
    comp: &Component,
    index: &ComponentIndex<'_>,
    data: &Map<String, Value>,
    mut style: Map<String, Value>,
    direction: &str,
) -> Result<String, RenderError> {
    set_default(&mut style, "display", json!("flex"));
    set_default(&mut style, "flexDirection", json!(direction));
    let children = render_children(comp, index, data)?;
    Ok(format!(
        "<div style=\"{}\">{children}</div>",
        style_string(&style)
    ))
}

fn render_grid(
    comp: &Component,
    index: &ComponentIndex<'_>,
    data: &Map<String, Value>,
    mut style: Map<String, Value>,
) -> Result<String, RenderError> {
    set_default(&mut style, "display", json!("grid"));
    if let Some(columns) = comp.field("columns") {
        let template = match columns.as_u64() {
            Some(n) => format!("repeat({n}, 1fr)"),
            None => display_string(columns),
        };
        set_default(&mut style, "gridTemplateColumns", json!(template));
    }
    if let Some(rows) = comp.field("rows") {
        let template = match rows.as_u64() {
            Some(n) => format!("repeat({n}, 1fr)"),
            None => display_string(rows),
        };
        set_default(&mut style, "gridTemplateRows", json!(template));
    }
    let children = render_children(comp, index, data)?;
    Ok(format!(
        "<div style=\"{}\">{children}</div>",
        style_string(&style)
    ))
}

fn render_box(
    comp: &Component,
    index: &ComponentIndex<'_>,
    data: &Map<String, Value>,
    style: Map<String, Value>,
) -> Result<String, RenderError> {
    let children = render_children(comp, index, data)?;
    Ok(format!(
        "<div style=\"{}\">{children}</div>",
        style_string(&style)
    ))
}

fn render_card(
    comp: &Component,
    index: &ComponentIndex<'_>,
    data: &Map<String, Value>,
    mut style: Map<String, Value>,
) -> Result<String, RenderError> {
    set_default(&mut style, "background", json!("rgba(255, 255, 255, 0.05)"));
    set_default(&mut style, "border", json!("1px solid rgba(255, 255, 255, 0.1)"));
    set_default(&mut style, "borderRadius", json!(16));
    set_default(&mut style, "padding", json!(24));
    let children = render_children(comp, index, data)?;
    Ok(format!(
        "<div style=\"{}\">{children}</div>",
        style_string(&style)
    ))
}

fn render_spacer(comp: &Component, mut style: Map<String, Value>) -> String {
    let flex = comp.field("flex").cloned().unwrap_or(json!(1));
    set_default(&mut style, "flex", flex);
    format!("<div style=\"{}\"></div>", style_string(&style))
}

fn render_divider(comp: &Component, mut style: Map<String, Value>) -> String {
    let orientation = comp.str_field("orientation").unwrap_or("horizontal");
    let thickness = comp.field("thickness").cloned().unwrap_or(json!(1));
    set_default(&mut style, "background", json!("rgba(255, 255, 255, 0.2)"));
    if orientation == "horizontal" {
        set_default(&mut style, "height", thickness);
        set_default(&mut style, "width", json!("100%"));
    } else {
        set_default(&mut style, "width", thickness);
        set_default(&mut style, "height", json!("100%"));
    }
    format!("<div style=\"{}\"></div>", style_string(&style))
}

// --- Leaf content ---

fn render_text(comp: &Component, data: &Map<String, Value>, mut style: Map<String, Value>) -> String {
    let raw = comp.field("text").cloned().unwrap_or(json!(""));
    let text = display_string(&resolve_binding(&raw, data));
    if text.contains('\n') {
        set_default(&mut style, "whiteSpace", json!("pre-line"));
    }
    set_default(&mut style, "color", json!("#ffffff"));
    set_default(&mut style, "lineHeight", json!(1.5));
    format!(
        "<div style=\"{}\">{}</div>",
        style_string(&style),
        escape_html(&text)
    )
}

fn render_image(comp: &Component, data: &Map<String, Value>, mut style: Map<String, Value>) -> String {
    let raw = comp.field("src").cloned().unwrap_or(json!(""));
    let src = display_string(&resolve_binding(&raw, data));
    let alt = escape_html(comp.str_field("alt").unwrap_or_default());

    // Width/height belong on the img element itself; hoist them off the wrapper.
    let mut img_style = Map::new();
    img_style.insert("maxWidth".to_string(), json!("100%"));
    img_style.insert("borderRadius".to_string(), json!(8));
    if let Some(width) = style.remove("width") {
        img_style.insert("width".to_string(), width);
    }
    if let Some(height) = style.remove("height") {
        img_style.insert("height".to_string(), height);
    }

    let img = format!(
        "<img src=\"{}\" alt=\"{alt}\" style=\"{}\">",
        escape_html(&src),
        style_string(&img_style)
    );
    format!("<div style=\"{}\">{img}</div>", style_string(&style))
}

fn render_icon(comp: &Component, mut style: Map<String, Value>) -> String {
    let icon = comp
        .field("icon")
        .or_else(|| comp.field("emoji"))
        .cloned()
        .unwrap_or(json!(""));
    set_default(&mut style, "display", json!("flex"));
    set_default(&mut style, "alignItems", json!("center"));
    set_default(&mut style, "justifyContent", json!("center"));
    if let Some(size) = comp.field("size") {
        set_default(&mut style, "fontSize", size.clone());
    }
    format!(
        "<div style=\"{}\">{}</div>",
        style_string(&style),
        escape_html(&display_string(&icon))
    )
}

fn render_avatar(comp: &Component, data: &Map<String, Value>, mut style: Map<String, Value>) -> String {
    let size = comp.field("size").cloned().unwrap_or(json!(48));
    set_default(&mut style, "display", json!("flex"));
    set_default(&mut style, "alignItems", json!("center"));
    set_default(&mut style, "justifyContent", json!("center"));
    set_default(&mut style, "borderRadius", json!("50%"));
    set_default(
        &mut style,
        "background",
        json!("linear-gradient(135deg, #e94560, #ff6b6b)"),
    );
    set_default(&mut style, "color", json!("white"));
    set_default(&mut style, "fontWeight", json!(600));
    set_default(&mut style, "overflow", json!("hidden"));
    set_default(&mut style, "width", size.clone());
    set_default(&mut style, "height", size.clone());

    // Initials scale with a numeric avatar size; a CSS-string size passes through.
    let initials_font_size = match size.as_f64() {
        Some(n) => json!((n * 0.4).trunc() as i64),
        None => size.clone(),
    };

    let inner = if let Some(src) = comp.field("src") {
        let src = display_string(&resolve_binding(src, data));
        let alt = escape_html(comp.str_field("alt").unwrap_or_default());
        format!(
            "<img src=\"{}\" alt=\"{alt}\" style=\"width:100%;height:100%;object-fit:cover\">",
            escape_html(&src)
        )
    } else if let Some(initials) = comp.str_field("initials") {
        set_default(&mut style, "fontSize", initials_font_size);
        escape_html(&initials.chars().take(2).collect::<String>().to_uppercase())
    } else if let Some(name) = comp.str_field("name") {
        let initials: String = name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .take(2)
            .collect();
        set_default(&mut style, "fontSize", initials_font_size);
        escape_html(&initials.to_uppercase())
    } else {
        String::new()
    };

    format!("<div style=\"{}\">{inner}</div>", style_string(&style))
}

// --- Data-driven collections ---

fn render_list(
    comp: &Component,
    index: &ComponentIndex<'_>,
    data: &Map<String, Value>,
    style: Map<String, Value>,
) -> Result<String, RenderError> {
    // Component-based children take precedence over data-driven items.
    let mut items_html: Vec<String> = Vec::new();
    if !comp.children.is_empty() {
        for child_id in &comp.children {
            if let Some(child) = index.get(child_id.as_str()) {
                items_html.push(render_component(child, index, data)?);
            }
        }
    } else {
        let raw = comp.field("items").cloned().unwrap_or(json!([]));
        let resolved = resolve_binding(&raw, data);
        let items = resolved.as_array().cloned().unwrap_or_default();
        for item in &items {
            items_html.push(escape_html(&display_string(item)));
        }
    }

    let last = items_html.len().saturating_sub(1);
    let lis: String = items_html
        .iter()
        .enumerate()
        .map(|(i, inner)| {
            let li_style = if i == last { LI_STYLE_LAST } else { LI_STYLE };
            format!("<li style=\"{li_style}\">{inner}</li>")
        })
        .collect();
    let ul = format!("<ul style=\"list-style:none;padding:0;margin:0\">{lis}</ul>");
    Ok(format!("<div style=\"{}\">{ul}</div>", style_string(&style)))
}

fn render_table(comp: &Component, data: &Map<String, Value>, style: Map<String, Value>) -> String {
    let table_style = "width:100%;border-collapse:collapse";
    let th_style = "padding:12px 16px;text-align:left;border-bottom:1px solid rgba(255,255,255,0.1);font-weight:600;color:#a0a0c0;background:rgba(255,255,255,0.05)";
    let td_style = "padding:12px 16px;text-align:left;border-bottom:1px solid rgba(255,255,255,0.1)";

    let mut thead = String::new();
    if let Some(headers) = comp.field("headers").and_then(Value::as_array) {
        if !headers.is_empty() {
            let ths: String = headers
                .iter()
                .map(|h| format!("<th style=\"{th_style}\">{}</th>", escape_html(&display_string(h))))
                .collect();
            thead = format!("<thead><tr>{ths}</tr></thead>");
        }
    }

    // Data-model rows win over literal rows when they resolve to something.
    let resolved = comp.field("data").map(|v| resolve_binding(v, data));
    let rows_value = match resolved {
        Some(v) if value_is_nonempty(&v) => v,
        _ => comp.field("rows").cloned().unwrap_or(json!([])),
    };
    let rows = rows_value.as_array().cloned().unwrap_or_default();

    let mut body_rows = Vec::with_capacity(rows.len());
    for row in &rows {
        let cells: Vec<Value> = match row {
            Value::Array(cells) => cells.clone(),
            Value::Object(record) => record.values().cloned().collect(),
            other => vec![other.clone()],
        };
        let tds: String = cells
            .iter()
            .map(|c| format!("<td style=\"{td_style}\">{}</td>", escape_html(&display_string(c))))
            .collect();
        body_rows.push(format!("<tr>{tds}</tr>"));
    }
    let tbody = if body_rows.is_empty() {
        String::new()
    } else {
        format!("<tbody>{}</tbody>", body_rows.join(""))
    };

    format!(
        "<div style=\"{}\"><table style=\"{table_style}\">{thead}{tbody}</table></div>",
        style_string(&style)
    )
}

// --- Feedback ---

fn render_progress(comp: &Component, data: &Map<String, Value>, mut style: Map<String, Value>) -> String {
    let raw = comp.field("value").cloned().unwrap_or(json!(0));
    let resolved = resolve_binding(&raw, data);
    let progress = match &resolved {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
    .clamp(0.0, 100.0);
    let color = comp
        .str_field("color")
        .unwrap_or("linear-gradient(90deg, #e94560, #ff6b6b)");

    set_default(&mut style, "background", json!("rgba(255, 255, 255, 0.1)"));
    set_default(&mut style, "borderRadius", json!(8));
    set_default(&mut style, "overflow", json!("hidden"));
    set_default(&mut style, "height", json!(8));

    let fill = format!(
        "<div style=\"height:100%;width:{progress}%;background:{color};transition:width 0.3s ease\"></div>"
    );
    format!("<div style=\"{}\">{fill}</div>", style_string(&style))
}

fn render_badge(comp: &Component, data: &Map<String, Value>, mut style: Map<String, Value>) -> String {
    let raw = comp
        .field("text")
        .or_else(|| comp.field("value"))
        .cloned()
        .unwrap_or(json!(""));
    let text = display_string(&resolve_binding(&raw, data));
    let color = comp.str_field("color").unwrap_or("#e94560");

    set_default(&mut style, "display", json!("inline-flex"));
    set_default(&mut style, "alignItems", json!("center"));
    set_default(&mut style, "justifyContent", json!("center"));
    set_default(&mut style, "padding", json!("4px 12px"));
    set_default(&mut style, "borderRadius", json!(12));
    set_default(&mut style, "background", json!(color));
    set_default(&mut style, "color", json!("white"));
    set_default(&mut style, "fontSize", json!(14));
    set_default(&mut style, "fontWeight", json!(600));

    format!(
        "<div style=\"{}\">{}</div>",
        style_string(&style),
        escape_html(&text)
    )
}

fn render_spinner(comp: &Component, mut style: Map<String, Value>) -> String {
    let size = comp.field("size").cloned().unwrap_or(json!(32));
    let color = comp.str_field("color").unwrap_or("#e94560");

    set_default(&mut style, "display", json!("inline-block"));
    set_default(&mut style, "width", size.clone());
    set_default(&mut style, "height", size);
    set_default(&mut style, "border", json!("3px solid rgba(255, 255, 255, 0.2)"));
    set_default(&mut style, "borderTopColor", json!(color));
    set_default(&mut style, "borderRadius", json!("50%"));

    // The animation name is derived from the component id so repeated
    // renders of the same state stay byte-identical.
    let anim_id = format!("spin-{}", css_ident(&comp.id));
    let keyframes = format!("@keyframes {anim_id}{{to{{transform:rotate(360deg)}}}}");
    style.insert("animation".to_string(), json!(format!("{anim_id} 1s linear infinite")));

    format!(
        "<style>{keyframes}</style><div style=\"{}\"></div>",
        style_string(&style)
    )
}

/// Whether a resolved value carries usable row data
fn value_is_nonempty(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Array(items) => !items.is_empty(),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Reduce an arbitrary component id to a safe CSS identifier fragment
fn css_ident(id: &str) -> String {
    id.chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '-' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comp(value: Value) -> Component {
        serde_json::from_value(value).unwrap()
    }

    fn empty_data() -> Map<String, Value> {
        Map::new()
    }

    #[test]
    fn test_empty_components_render_empty() {
        assert_eq!(render_components(&[], &empty_data()).unwrap(), "");
    }

    #[test]
    fn test_missing_root_errors() {
        let components = vec![comp(json!({"id": "t1", "component": "Text", "text": "x"}))];
        assert_eq!(
            render_components(&components, &empty_data()),
            Err(RenderError::MissingRoot)
        );
    }

    #[test]
    fn test_unknown_type_aborts_whole_render() {
        let components = vec![
            comp(json!({"id": "root", "component": "Column", "children": ["bad"]})),
            comp(json!({"id": "bad", "component": "Flerp"})),
        ];
        let err = render_components(&components, &empty_data()).unwrap_err();
        assert_eq!(
            err,
            RenderError::UnknownComponentType {
                id: "bad".to_string(),
                tag: "Flerp".to_string()
            }
        );
    }

    #[test]
    fn test_unreachable_unknown_type_is_tolerated() {
        let components = vec![
            comp(json!({"id": "root", "component": "Column", "children": []})),
            comp(json!({"id": "orphan", "component": "Flerp"})),
        ];
        assert!(render_components(&components, &empty_data()).is_ok());
    }

    #[test]
    fn test_column_defaults_and_children() {
        let components = vec![
            comp(json!({"id": "root", "component": "Column", "children": ["t1", "ghost"]})),
            comp(json!({"id": "t1", "component": "Text", "text": "hello"})),
        ];
        let html = render_components(&components, &empty_data()).unwrap();
        assert!(html.starts_with("<div style=\"display:flex;flex-direction:column\">"));
        assert!(html.contains("hello"));
        // "ghost" is a forward reference: skipped, not an error.
    }

    #[test]
    fn test_defaults_never_override_explicit_style() {
        let components = vec![comp(json!({
            "id": "root",
            "component": "Column",
            "style": {"flexDirection": "row-reverse"}
        }))];
        let html = render_components(&components, &empty_data()).unwrap();
        assert!(html.contains("flex-direction:row-reverse"));
        assert!(!html.contains("flex-direction:column"));
    }

    #[test]
    fn test_text_escapes_markup() {
        let components = vec![comp(json!({
            "id": "root",
            "component": "Text",
            "text": "<b>&'\"</b>"
        }))];
        let html = render_components(&components, &empty_data()).unwrap();
        assert!(html.contains("&lt;b&gt;&amp;&#39;&quot;&lt;/b&gt;"));
    }

    #[test]
    fn test_text_binding_resolution() {
        let data: Map<String, Value> =
            serde_json::from_value(json!({"user": {"name": "Alice"}})).unwrap();
        let components = vec![comp(json!({
            "id": "root",
            "component": "Text",
            "text": "Hi {{/user/name}}!"
        }))];
        let html = render_components(&components, &data).unwrap();
        assert!(html.contains("Hi Alice!"));
    }

    #[test]
    fn test_grid_template_from_count() {
        let components = vec![comp(json!({
            "id": "root",
            "component": "Grid",
            "columns": 3,
            "rows": "auto 1fr"
        }))];
        let html = render_components(&components, &empty_data()).unwrap();
        assert!(html.contains("grid-template-columns:repeat(3, 1fr)"));
        assert!(html.contains("grid-template-rows:auto 1fr"));
    }

    #[test]
    fn test_list_children_take_precedence_over_items() {
        let components = vec![
            comp(json!({
                "id": "root",
                "component": "List",
                "children": ["t1"],
                "items": ["ignored"]
            })),
            comp(json!({"id": "t1", "component": "Text", "text": "from child"})),
        ];
        let html = render_components(&components, &empty_data()).unwrap();
        assert!(html.contains("from child"));
        assert!(!html.contains("ignored"));
    }

    #[test]
    fn test_list_items_from_data_model() {
        let data: Map<String, Value> =
            serde_json::from_value(json!({"todo": ["one", "two"]})).unwrap();
        let components = vec![comp(json!({
            "id": "root",
            "component": "List",
            "items": "{{/todo}}"
        }))];
        let html = render_components(&components, &data).unwrap();
        assert!(html.contains(">one</li>"));
        // The last item drops the separator rule.
        assert!(html.contains("border-bottom:none\">two</li>"));
    }

    #[test]
    fn test_table_rows_from_binding() {
        let data: Map<String, Value> = serde_json::from_value(json!({
            "rows": [["a", 1], ["b", 2]]
        }))
        .unwrap();
        let components = vec![comp(json!({
            "id": "root",
            "component": "Table",
            "headers": ["Name", "Count"],
            "data": "{{/rows}}"
        }))];
        let html = render_components(&components, &data).unwrap();
        assert!(html.contains("<thead>"));
        assert!(html.contains(">Name</th>"));
        assert!(html.contains(">a</td>"));
        assert!(html.contains(">2</td>"));
    }

    #[test]
    fn test_table_record_rows_keep_field_order() {
        let components = vec![comp(json!({
            "id": "root",
            "component": "Table",
            "rows": [{"name": "a", "count": 1}]
        }))];
        let html = render_components(&components, &empty_data()).unwrap();
        let name_at = html.find(">a</td>").unwrap();
        let count_at = html.find(">1</td>").unwrap();
        assert!(name_at < count_at);
    }

    #[test]
    fn test_progress_clamps_value() {
        let components = vec![comp(json!({
            "id": "root",
            "component": "Progress",
            "value": 250
        }))];
        let html = render_components(&components, &empty_data()).unwrap();
        assert!(html.contains("width:100%"));
    }

    #[test]
    fn test_progress_bar_alias_kind() {
        let components = vec![comp(json!({
            "id": "root",
            "component": "ProgressBar",
            "value": "42"
        }))];
        let html = render_components(&components, &empty_data()).unwrap();
        assert!(html.contains("width:42%"));
    }

    #[test]
    fn test_avatar_initials_from_name() {
        let components = vec![comp(json!({
            "id": "root",
            "component": "Avatar",
            "name": "ada lovelace"
        }))];
        let html = render_components(&components, &empty_data()).unwrap();
        assert!(html.contains(">AL</div>"));
        assert!(html.contains("border-radius:50%"));
    }

    #[test]
    fn test_spinner_animation_is_stable() {
        let components = vec![comp(json!({"id": "root", "component": "Spinner"}))];
        let html = render_components(&components, &empty_data()).unwrap();
        assert!(html.contains("@keyframes spin-root"));
        assert!(html.contains("animation:spin-root 1s linear infinite"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let data: Map<String, Value> = serde_json::from_value(json!({
            "user": {"name": "Alice"},
            "items": ["x", "y", "z"]
        }))
        .unwrap();
        let components = vec![
            comp(json!({"id": "root", "component": "Column", "children": ["c", "l", "s"]})),
            comp(json!({"id": "c", "component": "Card", "children": ["t"]})),
            comp(json!({"id": "t", "component": "Text", "text": "{{/user/name}}"})),
            comp(json!({"id": "l", "component": "List", "items": "{{/items}}"})),
            comp(json!({"id": "s", "component": "Spinner"})),
        ];
        let first = render_components(&components, &data).unwrap();
        let second = render_components(&components, &data).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_duplicate_ids_last_write_wins() {
        let components = vec![
            comp(json!({"id": "root", "component": "Text", "text": "first"})),
            comp(json!({"id": "root", "component": "Text", "text": "second"})),
        ];
        let html = render_components(&components, &empty_data()).unwrap();
        assert!(html.contains("second"));
        assert!(!html.contains("first"));
    }
}
