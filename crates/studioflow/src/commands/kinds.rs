use colored::Colorize;
use studioflow_nimble::ResourceType;

pub fn handle() {
    for kind in ResourceType::ALL {
        let scope = match kind.parent() {
            Some(parent) => format!("{} スコープ", parent.slug()),
            None => "アカウント".to_string(),
        };
        println!(
            "{:<18} {:<38} {}",
            kind.slug().cyan(),
            kind.type_name(),
            scope.dimmed()
        );
    }
}
