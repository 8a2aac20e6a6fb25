//! Drives a `<pj1-input>` inside a form: typing, validation, error
//! annotation and Enter-to-submit.
//!
//! Usage: `input-demo [theme.json]`

use std::rc::Rc;

use anyhow::Context;
use fos_dom::{Document, Event, KeyboardEventInit};
use fos_input::{InputTheme, StyledInput};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let theme = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path))?;
            InputTheme::from_json(&json)?
        }
        None => InputTheme::default(),
    };

    let mut doc = Document::new();
    fos_input::register_with_theme(&mut doc, theme)?;

    let form = doc.create_element("form")?;
    doc.set_attribute(form, "action", "/signup")?;
    let body = doc.body();
    doc.append_child(body, form)?;

    let field = StyledInput::create(&mut doc)?;
    let host = field.host();
    doc.set_attribute(host, "name", "username")?;
    doc.set_attribute(host, "required", "")?;
    doc.set_attribute(host, "size", "xs")?;
    doc.set_attribute(host, "onchange", "console.log('typed', event.detail.target.value)")?;
    doc.append_child(form, host)?;

    let button = doc.create_element("button")?;
    doc.append_child(form, button)?;

    doc.add_event_listener(
        host,
        fos_input::CHANGE_EVENT,
        Rc::new(|doc: &mut Document, event: &mut Event| {
            if let Some(host) = event.current_target() {
                tracing::info!("value is now {:?}", doc.property(host, "value"));
            }
        }),
    )?;

    tracing::info!("valid before typing: {}", field.check_validity(&mut doc)?);
    doc.key_press(field.rendered_input(), KeyboardEventInit::enter())?;
    tracing::info!("submissions after empty Enter: {}", doc.submissions().len());

    doc.set_attribute(host, "error", "Pick a longer name")?;
    tracing::info!("error shown: {:?}", field.error_message(&doc));

    doc.user_input(field.rendered_input(), "ferris")?;
    doc.remove_attribute(host, "error")?;
    doc.key_press(field.rendered_input(), KeyboardEventInit::enter())?;

    for submission in doc.submissions() {
        println!("{:?} {} ?{}", submission.method, submission.action, submission.data.to_url_encoded());
    }
    Ok(())
}
