use tera::Tera;

pub const INVITE_TEMPLATE: &str = "invite.html";
pub const DEFAULT_INVITE_SUBJECT: &str = "Your request was approved: {{ site_name }}";
pub const SITE_NAME: &str = "Mammas Bahía";

pub fn get_default_template(name: &str) -> String {
    match name {
        INVITE_TEMPLATE => include_str!("../../../templates/invite.html").to_string(),
        _ => format!("<html><body>Default template for {} not found.</body></html>", name),
    }
}

/// Tera registry with every built-in mail template.
pub fn default_templates() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_template(INVITE_TEMPLATE, &get_default_template(INVITE_TEMPLATE))?;
    tera.add_raw_template("invite_subject", DEFAULT_INVITE_SUBJECT)?;
    Ok(tera)
}
