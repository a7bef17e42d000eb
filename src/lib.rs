//! # rivalscope - SEO Competitor Analysis as an HTTP Function
//!
//! This crate takes a website URL, scrapes its metadata, asks a chat-completion
//! API to classify the site and name its competitors, scrapes and scores those
//! competitors, and returns an aggregated JSON report with improvement
//! suggestions.
//!
//! ## Features
//!
//! - Metadata extraction with Open Graph fallbacks
//! - Streaming completions against any OpenAI-compatible API (Together by default)
//! - Tolerant parsing of model answers that may or may not be JSON
//! - Optional PageSpeed Insights, readability and growth-estimation sections
//! - Axum HTTP function, deployable as an Azure Functions custom handler
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use rivalscope::analysis::{AnalysisOptions, AnalysisRequest, ReportAssembler};
//! use rivalscope::crawler::{Fetcher, FetcherConfig};
//! use rivalscope::model::{ChatCompletionClient, ChatCompletionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let model = ChatCompletionClient::new(ChatCompletionConfig::new("your-api-key"))?;
//!     let fetcher = Fetcher::new(FetcherConfig::default())?;
//!     let assembler = ReportAssembler::new(fetcher, Arc::new(model), AnalysisOptions::default());
//!
//!     let report = assembler
//!         .analyze(AnalysisRequest::new("https://example.com"))
//!         .await?;
//!
//!     println!("{}", serde_json::to_string_pretty(&report)?);
//!     Ok(())
//! }
//! ```

mod error;

pub mod analysis;
pub mod config;
pub mod crawler;
pub mod insights;
pub mod model;
pub mod prompts;
pub mod server;

pub use error::{Error, Result};
