//! The per-request analysis pipeline

use std::sync::Arc;

use tracing::{info, instrument, warn};
use url::Url;

use super::normalize::{normalize_estimation, normalize_purpose, normalize_score};
use super::{
    AnalysisError, AnalysisOptions, AnalysisRequest, CompetitorEntry, Outcome, PurposeResult,
    Report, UserSection,
};
use crate::crawler::{Fetcher, SiteMetadata};
use crate::insights::{PageSpeedClient, analyze_readability};
use crate::model::{self, CompletionModel, ModelOutput};
use crate::prompts;

/// Builds a `Report` for one URL
///
/// Holds only read-only collaborators, so a single assembler can serve any
/// number of concurrent requests behind an `Arc`.
pub struct ReportAssembler {
    fetcher: Fetcher,
    model: Arc<dyn CompletionModel>,
    page_speed: Option<PageSpeedClient>,
    options: AnalysisOptions,
}

impl std::fmt::Debug for ReportAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportAssembler")
            .field("fetcher", &self.fetcher)
            .field("page_speed", &self.page_speed.is_some())
            .field("options", &self.options)
            .finish()
    }
}

impl ReportAssembler {
    /// Create an assembler without a PageSpeed client
    ///
    /// The user's page is always crawled with body text when
    /// `AnalysisOptions::readability` is set, whatever the fetcher's own
    /// `include_body_text` says.
    pub fn new(fetcher: Fetcher, model: Arc<dyn CompletionModel>, options: AnalysisOptions) -> Self {
        Self {
            fetcher,
            model,
            page_speed: None,
            options,
        }
    }

    /// Attach a PageSpeed client; the section is produced only when
    /// `AnalysisOptions::page_speed` is also set
    pub fn with_page_speed(mut self, client: PageSpeedClient) -> Self {
        self.page_speed = Some(client);
        self
    }

    /// The options in use
    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// Run the full analysis for one request
    #[instrument(skip(self, request), fields(url = %request.url))]
    pub async fn analyze(&self, request: AnalysisRequest) -> Result<Report, AnalysisError> {
        let url = validate_url(&request.url)?;

        let include_body_text =
            self.options.readability || self.fetcher.config().include_body_text;
        let user_metadata = self.fetcher.crawl_with_body(&url, include_body_text).await?;

        let purpose = self
            .resolve_purpose(&user_metadata, request.competitor_urls)
            .await?;
        if purpose.competitors.len() < self.options.min_competitors {
            return Err(AnalysisError::InsufficientCompetitors {
                found: purpose.competitors.len(),
                required: self.options.min_competitors,
            });
        }
        info!(
            category = %purpose.category,
            competitors = purpose.competitors.len(),
            "Classified site"
        );

        let user_score =
            normalize_score(&model::complete(&*self.model, &prompts::score_prompt(&user_metadata)).await?);

        let competitors = self.score_competitors(&purpose.competitors).await;

        let suggestions = self.suggestions(&user_metadata, &competitors).await;

        let page_speed = match &self.page_speed {
            Some(client) if self.options.page_speed => Some(client.analyze(&url).await),
            _ => None,
        };

        let readability = self
            .options
            .readability
            .then(|| analyze_readability(user_metadata.body_text.as_deref()));

        let estimation_growth = if self.options.estimation {
            Some(
                self.estimate_growth(&user_metadata, &suggestions, user_score.score)
                    .await,
            )
        } else {
            None
        };

        Ok(Report {
            input_url: url,
            purpose: purpose.category,
            user: UserSection {
                metadata: user_metadata,
                seo_score: user_score.score,
                explanation: user_score.explanation,
            },
            competitors,
            suggestions,
            page_speed,
            readability,
            estimation_growth,
        })
    }

    /// Classify the site, taking competitors from the caller when allowed
    async fn resolve_purpose(
        &self,
        metadata: &SiteMetadata,
        caller_competitors: Option<Vec<String>>,
    ) -> Result<PurposeResult, AnalysisError> {
        let caller_competitors = caller_competitors
            .filter(|_| self.options.caller_competitors)
            .map(|urls| {
                urls.into_iter()
                    .map(|url| url.trim().to_string())
                    .filter(|url| !url.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|urls| !urls.is_empty());

        let classified = model::complete(&*self.model, &prompts::purpose_prompt(metadata)).await;

        match caller_competitors {
            Some(competitors) => {
                let category = match classified {
                    Ok(output) => category_of(&output),
                    Err(e) => {
                        warn!(error = %e, "Classification failed, using caller competitors");
                        PurposeResult::UNKNOWN.to_string()
                    }
                };
                Ok(PurposeResult {
                    category,
                    competitors,
                })
            }
            None => Ok(normalize_purpose(
                &classified?,
                self.options.min_classified_competitors,
            )),
        }
    }

    /// Crawl and score every competitor in order, skipping failures
    async fn score_competitors(&self, urls: &[String]) -> Vec<CompetitorEntry> {
        let mut entries = Vec::with_capacity(urls.len());
        for url in urls {
            let metadata = match self.fetcher.crawl(url).await {
                Ok(metadata) => metadata,
                Err(e) => {
                    warn!(competitor = %url, error = %e, "Skipping competitor");
                    continue;
                }
            };

            let output = match model::complete(&*self.model, &prompts::score_prompt(&metadata)).await {
                Ok(output) => output,
                Err(e) => {
                    warn!(competitor = %url, error = %e, "Skipping unscored competitor");
                    continue;
                }
            };

            entries.push(CompetitorEntry {
                url: url.clone(),
                metadata,
                seo_score: normalize_score(&output),
            });
        }
        entries
    }

    async fn suggestions(
        &self,
        user: &SiteMetadata,
        competitors: &[CompetitorEntry],
    ) -> Outcome<ModelOutput> {
        let compared: Vec<&SiteMetadata> = competitors
            .iter()
            .take(self.options.suggestion_competitors)
            .map(|entry| &entry.metadata)
            .collect();

        match model::complete(&*self.model, &prompts::suggestions_prompt(user, &compared)).await {
            Ok(output) => Outcome::Ok(output),
            Err(e) => {
                warn!(error = %e, "Suggestions failed");
                Outcome::failed(format!("Failed to generate suggestions: {}", e))
            }
        }
    }

    async fn estimate_growth(
        &self,
        user: &SiteMetadata,
        suggestions: &Outcome<ModelOutput>,
        score: Option<u8>,
    ) -> Outcome<String> {
        let Some(suggestions) = suggestions.ok() else {
            return Outcome::failed("No suggestions to estimate from.");
        };

        let prompt = prompts::estimation_prompt(user, suggestions, score);
        match model::complete(&*self.model, &prompt).await {
            Ok(output) => Outcome::Ok(normalize_estimation(&output)),
            Err(e) => {
                warn!(error = %e, "Growth estimation failed");
                Outcome::failed(format!("Failed to estimate growth: {}", e))
            }
        }
    }
}

/// The `category` field of a classification, ignoring its competitors
fn category_of(output: &ModelOutput) -> String {
    output
        .as_object()
        .and_then(|object| object.get("category"))
        .and_then(|category| category.as_str())
        .map(str::trim)
        .filter(|category| !category.is_empty())
        .unwrap_or(PurposeResult::UNKNOWN)
        .to_string()
}

/// Accept only absolute http(s) URLs
fn validate_url(raw: &str) -> Result<String, AnalysisError> {
    let trimmed = raw.trim();
    if !trimmed.starts_with("http") {
        return Err(AnalysisError::InvalidUrl);
    }
    match Url::parse(trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(trimmed.to_string()),
        _ => Err(AnalysisError::InvalidUrl),
    }
}
