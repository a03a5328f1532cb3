//! Finder traits shared by the driver and its elements

use async_trait::async_trait;

use crate::by::By;
use crate::element::AndroidNativeElement;
use crate::error::Result;

/// Anything that can run find commands: the whole screen or a single view
#[async_trait]
pub trait SearchContext: Send + Sync {
    async fn find_element(&self, by: By) -> Result<AndroidNativeElement>;

    /// Matches in the order the server reports them; empty when none match
    async fn find_elements(&self, by: By) -> Result<Vec<AndroidNativeElement>>;
}

/// Lookups by visible text, layered on the generic find commands
#[async_trait]
pub trait FindsByText: SearchContext {
    async fn find_element_by_text(&self, text: &str) -> Result<AndroidNativeElement> {
        self.find_element(By::text(text)).await
    }

    async fn find_element_by_partial_text(&self, text: &str) -> Result<AndroidNativeElement> {
        self.find_element(By::partial_text(text)).await
    }

    async fn find_elements_by_text(&self, text: &str) -> Result<Vec<AndroidNativeElement>> {
        self.find_elements(By::text(text)).await
    }

    async fn find_elements_by_partial_text(
        &self,
        text: &str,
    ) -> Result<Vec<AndroidNativeElement>> {
        self.find_elements(By::partial_text(text)).await
    }
}
