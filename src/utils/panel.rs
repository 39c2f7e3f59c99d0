/// A simple aligned key/value panel for terminal stat blocks
pub struct Panel {
    title: String,
    fields: Vec<(String, String)>,
}

impl Panel {
    /// Create a new panel with the given title
    pub fn new(title: impl Into<String>) -> Self {
        Panel {
            title: title.into(),
            fields: Vec::new(),
        }
    }

    /// Append a labelled field to the panel
    pub fn field(mut self, label: &str, value: impl Into<String>) -> Self {
        self.fields.push((label.to_string(), value.into()));
        self
    }

    /// Render the panel as a formatted string
    pub fn render(&self) -> String {
        let label_width = self
            .fields
            .iter()
            .map(|(label, _)| label.len())
            .max()
            .unwrap_or(0);

        let mut output = String::new();
        output.push_str(&self.title);
        output.push('\n');
        output.push_str(&"-".repeat(self.title.len().max(label_width + 2)));
        output.push('\n');

        for (label, value) in &self.fields {
            output.push_str(&format!(
                "{:<width$}  {}\n",
                label,
                value,
                width = label_width
            ));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_panel() {
        let panel = Panel::new("AAPL Forecast")
            .field("Current Price", "$100.00")
            .field("Expected Change", "+10.00%");

        let rendered = panel.render();
        assert!(rendered.contains("AAPL Forecast"));
        assert!(rendered.contains("Current Price"));
        assert!(rendered.contains("$100.00"));
        assert!(rendered.contains("+10.00%"));
    }

    #[test]
    fn test_labels_are_aligned() {
        let panel = Panel::new("Stats")
            .field("A", "1")
            .field("Much Longer Label", "2");

        let rendered = panel.render();
        let lines: Vec<&str> = rendered.lines().collect();
        // Both value columns start at the same offset
        let short = lines.iter().find(|l| l.starts_with("A ")).unwrap();
        let long = lines.iter().find(|l| l.starts_with("Much")).unwrap();
        assert_eq!(short.find('1').unwrap(), long.find('2').unwrap());
    }
}
