//! # templar - render text templates from layered variable sources
//!
//! For CLI usage see `templar --help`.
//!
//! ## Introduction for developers
//!
//! Read this to understand how `templar` works internally.
//!
//! ### Variables
//!
//! Everything a template can reference is a [value::Variables] mapping: names to json values,
//! possibly nested. Variables come from
//!
//! - a literal input (a file in `KEY=VALUE` or json format)
//! - the process environment
//! - literal `variables` of a batch manifest item
//!
//! ### Providers and the chain
//!
//! A [provider::Provider] turns one raw input into variables. The input format picks the provider
//! for literal input ([provider::Format::provider]). A [provider::Chain] runs several providers in
//! order, later ones overwrite earlier ones:
//!
//! | environment policy | literal input | chain                      |
//! |--------------------|---------------|----------------------------|
//! | `Layered`          | yes           | format provider, environment |
//! | `Layered`          | no            | environment                |
//! | `Clear`            | yes           | format provider            |
//! | `Clear`            | no            | nothing, variables are empty |
//!
//! An environment variable therefore wins over a literal input of the same name.
//!
//! ### Batch manifests
//!
//! A [batch::Manifest] describes many renders at once. Each item is merged with the manifest
//! defaults ([batch::merge]) before it runs. Literal item variables win over the defaults, an
//! item input file suppresses the default variables.
//!
//! ### Rendering
//!
//! [build::TemplateBuilder] compiles Go `text/template` syntax with the sprig helpers installed
//! ([build::functions]) and renders into a writer. [pipeline::Pipeline] wires resolution,
//! template acquisition and output selection ([stream]) together; [dump] replaces rendering when
//! only the variables are of interest.
//!
pub mod batch;
pub mod build;
pub mod dump;
pub mod pipeline;
pub mod provider;
pub mod stream;
pub mod value;
