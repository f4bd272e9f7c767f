use std::sync::Arc;

use innube_templates_contracts::{Template, TemplateService, TEMPLATES};
use tera::Tera;
use tracing::trace;

#[derive(Debug, Clone)]
pub struct TemplateServiceImpl {
    tera: Arc<Tera>,
}

impl TemplateServiceImpl {
    /// Compiles all embedded templates.
    pub fn new() -> anyhow::Result<Self> {
        let mut tera = Tera::default();

        for &(name, template) in TEMPLATES {
            trace!(template = name, "compile template");
            tera.add_raw_template(name, template)?;
        }

        Ok(Self { tera: tera.into() })
    }
}

impl TemplateService for TemplateServiceImpl {
    fn render<T: Template>(&self, template: &T) -> anyhow::Result<String> {
        let context = tera::Context::from_serialize(template)?;
        self.tera.render(T::NAME, &context).map_err(Into::into)
    }
}
