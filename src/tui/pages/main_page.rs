use iocraft::prelude::*;

use crate::core::state::{ViewEvent, ViewState};
use crate::tui::AppContext;
use crate::tui::components::echo_block::EchoBlock;
use crate::tui::components::heading::Heading;
use crate::tui::components::input_section::InputSection;
use crate::tui::components::status_line::StatusLine;

/// Usable width inside the page padding, never wider than the terminal.
fn content_width(terminal_width: u16) -> u16 {
    terminal_width.saturating_sub(4).max(1)
}

/// The message/echo view. Owns the `ViewState`; children only display it.
#[component]
pub fn MainPage(mut hooks: Hooks) -> impl Into<AnyElement<'static>> {
    let (session, default_text) = {
        let app_ctx = hooks.use_context::<AppContext>();
        (app_ctx.session.clone(), app_ctx.default_text.clone())
    };

    let mut system = hooks.use_context_mut::<SystemContext>();
    let view = hooks.use_state(move || ViewState::new(default_text));
    let should_exit = hooks.use_state(|| false);
    let (width, _) = hooks.use_terminal_size();

    // Fetch the greeting once, then apply network outcomes as they arrive.
    // Subscribing first means the greeting cannot slip past us.
    let mut view_events = view;
    let session_events = session.clone();
    hooks.use_future(async move {
        let mut rx = session_events.subscribe();
        if session_events.initialize() {
            let next = view_events.read().apply(ViewEvent::GreetingRequested);
            view_events.set(next);
        }
        while let Some(event) = rx.recv().await {
            let next = view_events.read().apply(event);
            view_events.set(next);
        }
    });

    // Handle keyboard events.
    hooks.use_terminal_events({
        let mut view = view;
        let mut should_exit = should_exit;
        move |event| {
            let TerminalEvent::Key(key) = event else {
                return;
            };
            if key.kind != KeyEventKind::Press {
                return;
            }

            let event = match key.code {
                KeyCode::Esc => {
                    should_exit.set(true);
                    return;
                }
                KeyCode::Enter => {
                    let text = view.read().input.clone();
                    ViewEvent::EchoRequested {
                        seq: session.submit_echo(text),
                    }
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    let mut buf = view.read().input.clone();
                    buf.push(c);
                    ViewEvent::InputChanged(buf)
                }
                KeyCode::Backspace => {
                    let mut buf = view.read().input.clone();
                    buf.pop();
                    ViewEvent::InputChanged(buf)
                }
                _ => return,
            };
            let next = view.read().apply(event);
            view.set(next);
        }
    });

    if should_exit.get() {
        system.exit();
    }

    let state = view.read().clone();
    let busy_label = if state.awaiting_greeting {
        Some("loading greeting…".to_string())
    } else if state.echo_pending() {
        Some("waiting for echo…".to_string())
    } else {
        None
    };
    let error = state.last_error.as_ref().map(|e| e.error.to_string());

    let content_width = content_width(width);

    element! {
        View(
            flex_direction: FlexDirection::Column,
            width: content_width,
            padding_left: 1,
        ) {
            Heading(text: state.greeting.clone())
            InputSection(value: state.input.clone(), width: content_width)
            #(state.rendered_echo().map(|json| element! {
                EchoBlock(content: json)
            }))
            StatusLine(busy: busy_label, error: error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_width_never_exceeds_the_terminal() {
        assert_eq!(content_width(80), 76);
        assert_eq!(content_width(6), 2);
        assert_eq!(content_width(3), 1);
        assert_eq!(content_width(0), 1);
    }
}
