use iocraft::prelude::*;
use std::time::Duration;

#[derive(Default, Props)]
pub struct StatusLineProps {
    /// What we're waiting on, if anything.
    pub busy: Option<String>,
    pub error: Option<String>,
}

/// Spinner while requests are in flight, otherwise the last error or a key hint.
#[component]
pub fn StatusLine(mut hooks: Hooks, props: &StatusLineProps) -> impl Into<AnyElement<'static>> {
    let tick = hooks.use_state(|| 0u64);

    // Tick timer for spinner animation.
    let mut tick_clone = tick;
    hooks.use_future(async move {
        loop {
            tokio::time::sleep(Duration::from_millis(100)).await;
            tick_clone += 1;
        }
    });

    let spinners = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    let idx = (*tick.read() % spinners.len() as u64) as usize;

    let (text, color) = match (&props.busy, &props.error) {
        (Some(label), _) => (format!("{} {}", spinners[idx], label), Color::Yellow),
        (None, Some(error)) => (format!("✗ {error}"), Color::Red),
        (None, None) => ("Enter send · Esc quit".to_string(), Color::DarkGrey),
    };

    element! {
        View(margin_top: 1, padding_left: 1) {
            Text(content: text, color: color)
        }
    }
}
