//! `courier types`: the event catalogue and its standard routing.

use courier_events::EventType;
use courier_handlers::{Latency, Services};

use crate::theme::Theme;

/// Print every event type, its wire name and the handlers `run` wires to it.
pub(crate) fn list_types() {
    let registry = Services::new(Latency::Disabled).registry();

    println!("{}", Theme::header("Event types"));
    println!("{}", Theme::separator());
    for event_type in EventType::ALL {
        let handlers: Vec<&str> = registry
            .handlers_for(event_type)
            .iter()
            .map(|h| h.name())
            .collect();
        println!(
            "  {:<18} {}",
            event_type.as_str(),
            Theme::dimmed(&handlers.join(", "))
        );
    }
}
