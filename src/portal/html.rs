use scraper::{Html, Selector};

/// Value of the first `<input>` whose `name` attribute equals `field`.
pub fn input_value(html: &str, field: &str) -> Option<String> {
    let selector = Selector::parse(&format!(r#"input[name="{field}"]"#)).ok()?;
    let document = Html::parse_document(html);
    let value = document
        .select(&selector)
        .next()?
        .value()
        .attr("value")?
        .to_string();
    Some(value)
}
