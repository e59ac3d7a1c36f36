use tintview_core::{AppViewModel, Phase};

/// One status line per view change.
pub fn render_line(view: &AppViewModel) -> String {
    let body = match view.phase {
        Phase::Idle => "idle".to_string(),
        Phase::Loading => "loading...".to_string(),
        Phase::Loaded => format!("showing {}", view.image_url.as_deref().unwrap_or("?")),
        Phase::Error => format!(
            "error: {}",
            view.error_message.as_deref().unwrap_or_default()
        ),
    };
    let button = if view.fetch_enabled {
        "[Another]"
    } else {
        "[ ... ]"
    };
    format!("{body} | background {} | {button}", view.background)
}

pub fn render(view: &AppViewModel) {
    println!("{}", render_line(view));
}
