//! # CalcDesk
//!
//! CalcDesk holds the engines behind a multi-calculator app, free of any UI:
//!
//! * **Basic calculator**: [`BasicCalculator`], an immediate-execution
//!   accumulator (`2 + 3 × 4 =` gives `20`) with a history of completed
//!   operations.
//! * **Scientific calculator**: [`ScientificCalculator`], which edits an
//!   expression string and evaluates it with precedence, functions,
//!   constants, factorial, degrees/radians and a memory register.
//! * **Dates**: [`dates`] for exact age, derived totals, next birthday and
//!   summed work experience, plus the [`experience`] tracker that drives the
//!   work-period list.
//! * **Saved history**: [`history_store::ExperienceStore`] with in-memory and
//!   JSON-lines implementations, behind a [`auth::CredentialProvider`].
//! * **Themes**: [`theme::LlmThemeGenerator`] turns a description into a color
//!   theme through any [`ClientWrapper`], such as
//!   [`clients::openai::OpenAIClient`].
//!
//! ## Basic calculator
//!
//! ```rust
//! use calcdesk::basic::Operator;
//! use calcdesk::BasicCalculator;
//!
//! let mut calc = BasicCalculator::new();
//! calc.input_digit('2');
//! calc.handle_operator(Operator::Add);
//! calc.input_digit('3');
//! calc.handle_operator(Operator::Multiply);
//! calc.input_digit('4');
//! calc.handle_equals();
//!
//! assert_eq!(calc.display_value(), "20");
//! assert_eq!(calc.history().len(), 2);
//! ```
//!
//! ## Scientific calculator
//!
//! ```rust
//! use calcdesk::basic::Operator;
//! use calcdesk::scientific::Function;
//! use calcdesk::ScientificCalculator;
//!
//! let mut calc = ScientificCalculator::new();
//! calc.input_digit('2');
//! calc.input_operator(Operator::Add);
//! calc.input_digit('3');
//! calc.input_operator(Operator::Multiply);
//! calc.input_digit('4');
//! calc.calculate();
//! assert_eq!(calc.display(), "14");
//!
//! calc.input_function(Function::Factorial);
//! calc.calculate();
//! assert_eq!(calc.display(), "8.71782912e+10");
//! ```
//!
//! ## Themes
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use calcdesk::clients::openai::OpenAIClient;
//! use calcdesk::theme::{LlmThemeGenerator, ThemeGenerator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let config = calcdesk::CalcDeskConfig::default();
//!     let client = Arc::new(OpenAIClient::new_with_model_string(
//!         &std::env::var("OPEN_AI_SECRET")?,
//!         &config.theme_model,
//!     ));
//!     let theme = LlmThemeGenerator::new(client).generate_theme("ocean sunset").await?;
//!     for (name, value) in theme.css_variables()? {
//!         println!("{}: {};", name, value);
//!     }
//!     Ok(())
//! }
//! ```

use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialise the global [`env_logger`] subscriber exactly once.
///
/// Diagnostics follow `RUST_LOG`; calling this more than once is harmless.
///
/// ```rust
/// calcdesk::init_logger();
/// log::info!("Logger is ready");
/// ```
pub fn init_logger() {
    INIT_LOGGER.call_once(|| {
        env_logger::init();
    });
}

// Import the top-level `calcdesk` module.
pub mod calcdesk;

// Re-exporting key items for easier external access.
pub use calcdesk::auth;
pub use calcdesk::basic;
pub use calcdesk::client_wrapper;
pub use calcdesk::client_wrapper::{ClientWrapper, Message, Role};
pub use calcdesk::clients;
pub use calcdesk::config::CalcDeskConfig;
pub use calcdesk::dates;
pub use calcdesk::evaluator;
pub use calcdesk::experience;
pub use calcdesk::expression;
pub use calcdesk::format;
pub use calcdesk::history;
pub use calcdesk::history_store;
pub use calcdesk::scientific;
pub use calcdesk::theme;
pub use calcdesk::{BasicCalculator, ScientificCalculator};
