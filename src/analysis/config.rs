//! # Analysis Options
//!
//! Feature switches for the report assembler. The optional sections
//! (readability, page speed, growth estimation) and caller-supplied competitor
//! lists are all controlled here, together with the competitor thresholds.

/// Options controlling which report sections are produced
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Score the readability of the user's body text
    pub readability: bool,

    /// Query PageSpeed Insights for the user's URL
    pub page_speed: bool,

    /// Ask the model for an estimated score increase
    pub estimation: bool,

    /// Use `competitorUrls` from the request when present
    pub caller_competitors: bool,

    /// Competitors a classification must name to be accepted
    pub min_classified_competitors: usize,

    /// Competitors required before an analysis proceeds
    pub min_competitors: usize,

    /// Competitors compared in the suggestions prompt
    pub suggestion_competitors: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            readability: true,
            page_speed: true,
            estimation: false,
            caller_competitors: false,
            min_classified_competitors: 4,
            min_competitors: 2,
            suggestion_competitors: 2,
        }
    }
}

/// Builder for AnalysisOptions
#[derive(Debug, Default)]
pub struct AnalysisOptionsBuilder {
    options: AnalysisOptions,
}

impl AnalysisOptionsBuilder {
    /// Create a new builder with default options
    pub fn new() -> Self {
        Self {
            options: AnalysisOptions::default(),
        }
    }

    /// Enable or disable the readability section
    pub fn readability(mut self, readability: bool) -> Self {
        self.options.readability = readability;
        self
    }

    /// Enable or disable the page-speed section
    pub fn page_speed(mut self, page_speed: bool) -> Self {
        self.options.page_speed = page_speed;
        self
    }

    /// Enable or disable the growth estimation
    pub fn estimation(mut self, estimation: bool) -> Self {
        self.options.estimation = estimation;
        self
    }

    /// Accept competitor URLs supplied by the caller
    pub fn caller_competitors(mut self, caller_competitors: bool) -> Self {
        self.options.caller_competitors = caller_competitors;
        self
    }

    /// Set the minimum number of competitors a classification must name
    pub fn min_classified_competitors(mut self, min: usize) -> Self {
        self.options.min_classified_competitors = min;
        self
    }

    /// Set the minimum number of competitors required to proceed
    pub fn min_competitors(mut self, min: usize) -> Self {
        self.options.min_competitors = min;
        self
    }

    /// Build the options
    pub fn build(self) -> AnalysisOptions {
        self.options
    }
}

impl AnalysisOptions {
    /// Create a new builder
    pub fn builder() -> AnalysisOptionsBuilder {
        AnalysisOptionsBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = AnalysisOptions::default();

        assert!(options.readability);
        assert!(options.page_speed);
        assert!(!options.estimation);
        assert!(!options.caller_competitors);
        assert_eq!(options.min_classified_competitors, 4);
        assert_eq!(options.min_competitors, 2);
        assert_eq!(options.suggestion_competitors, 2);
    }

    #[test]
    fn test_builder() {
        let options = AnalysisOptions::builder()
            .readability(false)
            .page_speed(false)
            .estimation(true)
            .caller_competitors(true)
            .min_competitors(1)
            .build();

        assert!(!options.readability);
        assert!(!options.page_speed);
        assert!(options.estimation);
        assert!(options.caller_competitors);
        assert_eq!(options.min_competitors, 1);
    }
}
