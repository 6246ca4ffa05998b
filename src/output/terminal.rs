// Colored terminal output for the accumulated registry and the final list.

use colored::Colorize;

use crate::topics::registry::TopicRegistry;

/// Display the surviving registry entries in discovery order.
pub fn display_registry(registry: &TopicRegistry) {
    println!(
        "\n{}",
        format!("=== Accumulated topics ({}) ===", registry.len()).bold()
    );

    if registry.is_empty() {
        println!("  {}", "No topics survived the extraction rounds.".dimmed());
        return;
    }

    for (label, id) in registry.entries() {
        println!("  {:>4}  {label}", format!("{id}.").dimmed());
    }
}

/// Display the final consolidated topic list.
pub fn display_final_topics(topics: &[String]) {
    println!(
        "\n{}",
        format!("=== Final topics ({}) ===", topics.len()).bold()
    );

    for (i, topic) in topics.iter().enumerate() {
        println!("  {:>3}. {topic}", i + 1);
    }
    println!();
}
