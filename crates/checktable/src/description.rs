//! Service description computation.

use crate::collaborators::CheckCatalog;

/// Characters the monitoring core does not accept in service descriptions
pub const ILLEGAL_CHARS: &str = "`;~!$%^&*|'\"<>?,()=";

/// Compute the service description of a check on a host.
///
/// The hostname does not influence the template lookup but is part of the
/// contract so that callers always describe a service in the context of the
/// host it runs on.
pub fn service_description(
    catalog: &dyn CheckCatalog,
    _hostname: &str,
    check_id: &str,
    item: Option<&str>,
) -> String {
    let description = match catalog.description_template(check_id) {
        Some(template) => expand_template(template, item),
        None => match item {
            Some(item) => format!("Unimplemented check {check_id} / {item}"),
            None => format!("Unimplemented check {check_id}"),
        },
    };

    sanitize(&description)
}

fn expand_template(template: &str, item: Option<&str>) -> String {
    match item {
        Some(item) if template.contains("%s") => template.replacen("%s", item, 1),
        Some(item) => format!("{template} {item}"),
        None => template.replacen("%s", "", 1),
    }
}

/// Remove illegal characters and trailing whitespace
pub fn sanitize(description: &str) -> String {
    let cleaned: String = description.chars().filter(|c| !ILLEGAL_CHARS.contains(*c)).collect();
    cleaned.trim_end().to_string()
}
