//! template builder
//!
//! Binds [Variables] to template source and renders into a writer. Templates use Go's
//! `text/template` syntax (evaluated by [lithos_gotmpl_core]) with the Go builtins and the sprig
//! helper library ([lithos_sprig]) installed.
//!
//! The template is rendered completely before anything is written, a failing template leaves the
//! writer untouched.
use crate::value::Variables;
use lithos_gotmpl_core::{
    install_text_template_functions, FunctionRegistry, FunctionRegistryBuilder, Template,
};
use std::io::Write;

#[derive(Debug, derive_new::new)]
pub struct TemplateBuilder<'a> {
    /// name used in error messages, usually the template path
    name: &'a str,
    source: &'a str,
    variables: &'a Variables,
}

/// Go template builtins (`and`, `len`, `printf`, ...) plus sprig (`default`, `upper`, `date`, ...)
pub fn functions() -> FunctionRegistry {
    let mut builder = FunctionRegistryBuilder::new();
    install_text_template_functions(&mut builder);
    lithos_sprig::install_sprig_functions(&mut builder);
    builder.build()
}

impl<'a> TemplateBuilder<'a> {
    /// Compile the template and render it into `writer`
    pub fn build(&self, writer: &mut dyn Write) -> Result<(), BuildError> {
        let rendered = self.render()?;
        writer.write_all(rendered.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Render into a string
    pub fn render(&self) -> Result<String, BuildError> {
        let template = Template::parse_with_functions(self.name, self.source, functions())
            .map_err(|err| BuildError::TemplateSyntax {
                template: self.display_name(),
                message: err.to_string(),
            })?;

        tracing::trace!(template = self.name, "executing template");
        template
            .render(&self.variables.to_json())
            .map_err(|err| BuildError::Render {
                template: self.display_name(),
                message: err.to_string(),
                variables: self.variables.clone(),
            })
    }

    fn display_name(&self) -> String {
        if self.name.is_empty() {
            "<stdin>".to_string()
        } else {
            self.name.to_string()
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum BuildError {
    #[error("failed to parse template {template}: {message}")]
    TemplateSyntax { template: String, message: String },
    #[error("failed to render template {template}: {message}\nvariables: {variables}")]
    Render {
        template: String,
        message: String,
        variables: Variables,
    },
    #[error("failed to write output")]
    Io(#[from] std::io::Error),
}
