//! Prompt template rendering.

use std::collections::HashMap;

/// Render `{{name}}` placeholders in a single left-to-right pass.
///
/// Substituted values are never rescanned, so a question that happens to
/// contain `{{context}}` is inserted verbatim. Unknown placeholders are kept.
pub fn render(template: &str, vars: &HashMap<&str, &str>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        match after.find("}}") {
            Some(end) => {
                let name = after[..end].trim();
                match vars.get(name) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&rest[start..start + 2 + end + 2]),
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_template() {
        let vars = HashMap::from([("name", "Alice"), ("count", "5")]);
        assert_eq!(
            render("Hello {{name}}, you have {{count}} messages.", &vars),
            "Hello Alice, you have 5 messages."
        );
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let vars = HashMap::from([("question", "what is {{context}}?"), ("context", "X")]);
        assert_eq!(
            render("{{context}} / {{question}}", &vars),
            "X / what is {{context}}?"
        );
    }

    #[test]
    fn test_unknown_and_unclosed_placeholders_kept() {
        let vars = HashMap::from([("a", "1")]);
        assert_eq!(render("{{a}} {{b}} {{c", &vars), "1 {{b}} {{c");
    }
}
