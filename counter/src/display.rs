//! Rendering a counter result for the page.

use crate::counter::VisitResult;
use crate::options::Environment;

pub const LOADING_LABEL: &str = "Counting visitors...";

/// `"1,234 visitors"`, with the source tag appended in development.
pub fn render(result: &VisitResult, environment: Environment) -> String {
    let mut label = format!("{} visitors", group_thousands(result.count));
    if environment.is_development() {
        label.push_str(&format!(" ({})", result.source));
    }
    label
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Source;

    fn result(count: u64, source: Source) -> VisitResult {
        VisitResult {
            success: true,
            count,
            source,
            error: None,
        }
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_production_hides_source() {
        let r = result(1234, Source::Fallback);
        assert_eq!(render(&r, Environment::Production), "1,234 visitors");
    }

    #[test]
    fn test_development_shows_source() {
        let r = result(151, Source::ServerMemory);
        assert_eq!(
            render(&r, Environment::Development),
            "151 visitors (server-memory)"
        );
    }
}
