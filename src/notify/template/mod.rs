use handlebars::{no_escape, Handlebars, TemplateError};

pub const COMMENT_TEMPLATE: &str = "comment";

pub fn handlebars<'hb>() -> Result<Handlebars<'hb>, TemplateError> {
    let mut hb = Handlebars::new();
    hb.set_strict_mode(true);
    hb.register_escape_fn(no_escape);

    let comment = include_str!("./comment.hbs");

    hb.register_template_string(COMMENT_TEMPLATE, comment)?;

    Ok(hb)
}
