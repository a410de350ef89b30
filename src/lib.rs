//! sheetprompt - Excel knowledge base to Modelfile system prompt
//!
//! This crate reads a workbook where every sheet is one category of facts
//! (header row = column names, following rows = entries) and turns it into a
//! single structured system prompt: a persona preamble, one headed bullet
//! block per category, and closing response instructions. The prompt is
//! wrapped in an Ollama-style Modelfile (`FROM`, `SYSTEM`, `PARAMETER`,
//! `TEMPLATE`).
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use sheetprompt::GeneratorBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create a generator with default settings
//!     let generator = GeneratorBuilder::new().build()?;
//!
//!     // Read the workbook, write the Modelfile (and debug_content.txt)
//!     let report = generator.generate("BTS_SIO_Infos.xlsx", "Modelfile")?;
//!     println!("{} rows, {} characters", report.total_rows(), report.document_chars);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Custom Configuration
//!
//! ```rust,no_run
//! use sheetprompt::{FormatPreset, GeneratorBuilder, ModelParameters, SheetSelector};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let generator = GeneratorBuilder::new()
//!         .with_preset(FormatPreset::Compact)  // "## TITLE" headers, min length 3
//!         .with_sheet_selector(SheetSelector::Names(vec![
//!             "Admission".to_string(),
//!             "Options".to_string(),
//!         ]))
//!         .with_base_model("mistral")
//!         .with_parameters(ModelParameters {
//!             num_ctx: Some(8192),
//!             ..ModelParameters::default()
//!         })
//!         .without_debug_copy()
//!         .build()?;
//!
//!     generator.generate("BTS_SIO_Infos.xlsx", "Modelfile")?;
//!     Ok(())
//! }
//! ```
//!
//! # Convert to String
//!
//! ```rust,no_run
//! use std::fs::File;
//! use sheetprompt::GeneratorBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let generator = GeneratorBuilder::new().build()?;
//!     let input = File::open("BTS_SIO_Infos.xlsx")?;
//!
//!     // Render the Modelfile in memory instead of writing files
//!     let modelfile = generator.generate_to_string(input)?;
//!     println!("{}", modelfile);
//!
//!     Ok(())
//! }
//! ```

mod api;
mod assembler;
mod builder;
mod error;
mod formatter;
pub mod logging;
mod output;
mod parser;
mod security;
mod types;

// 公開API
pub use api::{
    DateFormat, EmptyRowPolicy, FormatPreset, HeaderStyle, ModelParameters, SheetSelector,
    DEFAULT_GENERIC_LABELS,
};
pub use assembler::Persona;
pub use builder::{
    GeneratorBuilder, PromptGenerator, DEFAULT_BASE_MODEL, DEFAULT_DEBUG_PATH, DEFAULT_INPUT_PATH,
    DEFAULT_OUTPUT_PATH,
};
pub use error::SheetPromptError;
pub use types::{
    CategoryStats, CellValue, Category, GenerationReport, PromptDocument, Row,
    DEFAULT_CATEGORY_NAME,
};
