use std::sync::Arc;

use tracing::info;

use crate::api::models::QaPair;
use crate::config::Config;
use crate::error::Result;
use crate::llm::{self, LanguageModel, OpenAiClient};
use crate::parser::ReplyParser;
use crate::scraper::{FirecrawlClient, Format, Scraper};

/// Scrape a page, ask the model for Q&A pairs about it, parse the reply.
pub struct QaService {
    scraper: Arc<dyn Scraper>,
    model: Arc<dyn LanguageModel>,
    parser: Arc<dyn ReplyParser>,
}

impl QaService {
    pub fn new(scraper: Arc<dyn Scraper>, model: Arc<dyn LanguageModel>, parser: Arc<dyn ReplyParser>) -> Self {
        Self { scraper, model, parser }
    }

    pub fn from_config(config: &Config) -> Self {
        let scraper = FirecrawlClient::new(config.firecrawl_api_key.clone(), config.firecrawl_api_url.clone());
        let model = OpenAiClient::new(
            config.openai_api_key.clone(),
            config.openai_api_url.clone(),
            config.openai_model.clone(),
        );
        let parser = config.parser.build(&config.pair_keys);
        Self::new(Arc::new(scraper), Arc::new(model), parser)
    }

    pub async fn generate(&self, url: &str) -> Result<Vec<QaPair>> {
        info!("Starting Firecrawl scrape");
        let scraped = self.scraper.scrape(url, &[Format::Markdown]).await?;
        info!("Firecrawl scrape completed");

        let content = scraped.markdown();
        info!("Extracted content length: {} characters", content.len());

        let format = self.parser.response_format();
        info!("Sending request to language model");
        let reply = self
            .model
            .complete(&llm::system_prompt(format), &llm::build_prompt(content), format)
            .await?;
        info!("Received response from language model");

        let pairs = self.parser.parse(&reply)?;
        info!("Generated {} Q&A pairs", pairs.len());
        Ok(pairs)
    }
}
