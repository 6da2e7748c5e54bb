//! Viewer Page Shell
//!
//! Generates the self-contained HTML page served for a surface. The page
//! is a thin shell: it opens a WebSocket to the surface, replaces the
//! canvas root's innerHTML on `"html"` events, and shows a closed notice
//! on `"deleteSurface"`. All rendering is done server-side; the current
//! markup is embedded at page-build time so there is no flash of empty
//! content while the socket connects.

use crate::surface::{SizePreset, Surface};

/// Build the viewer HTML page for a surface
#[must_use]
pub fn canvas_page(surface: &Surface, initial_html: &str) -> String {
    let size = &surface.size;
    let auto_sized =
        size.preset == SizePreset::Auto || (size.width.is_none() && size.height.is_none());

    let (canvas_width, canvas_height, canvas_max_width, canvas_max_height, body_display) =
        if auto_sized {
            (
                "100%".to_string(),
                "100%".to_string(),
                "none",
                "none",
                "block",
            )
        } else {
            (
                size.css_width(),
                size.css_height(),
                "100vw",
                "100vh",
                "flex",
            )
        };

    let width_label = size
        .width
        .map_or_else(|| "auto".to_string(), |w| w.to_string());
    let height_label = size
        .height
        .map_or_else(|| "auto".to_string(), |h| h.to_string());
    let surface_id = &surface.surface_id;
    let preset = size.preset.name();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Canvas - {surface_id}</title>
    <style>
        * {{ margin: 0; padding: 0; box-sizing: border-box; }}
        html, body {{
            width: 100%; height: 100%;
            background: #0d0d1a; color: #ffffff;
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, sans-serif;
            overflow: hidden;
            display: {body_display}; justify-content: center; align-items: center;
        }}
        #canvas-container {{
            width: {canvas_width}; height: {canvas_height};
            max-width: {canvas_max_width}; max-height: {canvas_max_height};
            background: #1a1a2e; position: relative; overflow: hidden;
        }}
        #canvas-root {{ width: 100%; height: 100%; overflow: hidden; }}
        #status {{
            position: absolute; top: 16px; right: 16px;
            padding: 8px 16px; border-radius: 4px; font-size: 12px;
            background: rgba(0,0,0,0.5); z-index: 1000;
        }}
        #status.connected {{ color: #4ade80; }}
        #status.disconnected {{ color: #f87171; }}
        #status.connecting {{ color: #fbbf24; }}
        #size-info {{
            position: absolute; bottom: 16px; left: 16px;
            padding: 4px 8px; border-radius: 4px; font-size: 10px;
            background: rgba(0,0,0,0.5); color: #666; z-index: 1000;
        }}
    </style>
</head>
<body>
    <div id="canvas-container">
        <div id="status" class="connecting">Connecting...</div>
        <div id="size-info">{width_label}x{height_label} ({preset})</div>
        <div id="canvas-root">{initial_html}</div>
    </div>
    <script>
    (function() {{
        const wsUrl = (location.protocol === 'https:' ? 'wss:' : 'ws:')
            + '//' + location.host + '/ws/{surface_id}';
        const statusEl = document.getElementById('status');
        const rootEl = document.getElementById('canvas-root');
        let ws, reconnects = 0;

        function connect() {{
            statusEl.className = 'connecting';
            statusEl.textContent = 'Connecting...';
            ws = new WebSocket(wsUrl);
            ws.onopen = () => {{
                statusEl.className = 'connected';
                statusEl.textContent = 'Connected';
                reconnects = 0;
            }};
            ws.onmessage = (e) => {{
                try {{
                    const msg = JSON.parse(e.data);
                    if (msg.type === 'html') {{
                        rootEl.innerHTML = msg.html;
                    }} else if (msg.type === 'deleteSurface') {{
                        rootEl.innerHTML = '<div style="text-align:center;padding:48px"><h2>Canvas Closed</h2></div>';
                    }}
                }} catch (err) {{
                    console.error('Parse error:', err);
                }}
            }};
            ws.onclose = () => {{
                statusEl.className = 'disconnected';
                statusEl.textContent = 'Disconnected';
                if (reconnects < 10) {{ reconnects++; setTimeout(connect, 2000); }}
            }};
            ws.onerror = (err) => console.error('WS error:', err);
        }}
        connect();
    }})();
    </script>
</body>
</html>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::CanvasSize;
    use chrono::Utc;

    fn surface(size: CanvasSize) -> Surface {
        Surface {
            surface_id: "s1".to_string(),
            name: None,
            device_id: None,
            size,
            local_url: "http://localhost:8080/canvas/s1".to_string(),
            ws_url: "ws://localhost:8080/ws/s1".to_string(),
            created_at: Utc::now(),
            connected_clients: 0,
        }
    }

    #[test]
    fn test_page_embeds_initial_html_and_ws_path() {
        let page = canvas_page(&surface(CanvasSize::default()), "<p>hello</p>");
        assert!(page.contains("<div id=\"canvas-root\"><p>hello</p></div>"));
        assert!(page.contains("/ws/s1"));
        assert!(page.contains("deleteSurface"));
    }

    #[test]
    fn test_auto_size_fills_viewport() {
        let page = canvas_page(&surface(CanvasSize::default()), "");
        assert!(page.contains("width: 100%; height: 100%;"));
        assert!(page.contains("display: block;"));
        assert!(page.contains("autoxauto (auto)"));
    }

    #[test]
    fn test_fixed_size_centers_canvas() {
        let size = CanvasSize::from_preset_name("tv_1080p").unwrap();
        let page = canvas_page(&surface(size), "");
        assert!(page.contains("width: 1920px; height: 1080px;"));
        assert!(page.contains("max-width: 100vw;"));
        assert!(page.contains("display: flex;"));
        assert!(page.contains("1920x1080 (tv_1080p)"));
    }
}
