//! Doctype simplification.

use crate::patterns::DOCTYPE;

pub const HTML5_DOCTYPE: &str = "<!DOCTYPE html>";

/// Rewrite any doctype declaration to the HTML5 form.
pub fn simple_doctype(text: &str) -> String {
    DOCTYPE.replace_all(text, HTML5_DOCTYPE).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html4_strict() {
        let src = r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd"><html>"#;
        assert_eq!(simple_doctype(src), "<!DOCTYPE html><html>");
    }

    #[test]
    fn lowercase_doctype() {
        assert_eq!(simple_doctype("<!doctype html>"), HTML5_DOCTYPE);
    }
}
