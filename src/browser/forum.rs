//! The orbi.kr driver: login, listing-page fetch, per-post delete.
//!
//! Everything site-specific lives here: the URLs, the element selectors, and
//! the exact click sequences. The workflow layers only see [`ListingSource`]
//! and [`PostDeleter`].

use super::session::{BrowserError, ForumSession};
use crate::config::SweepConfig;
use crate::listing::{ListingPage, ListingSource, RawRow};
use crate::sweep::{DeleteOutcome, PostDeleter};
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::{
    EventJavascriptDialogOpening, HandleJavaScriptDialogParams,
};
use chromiumoxide::Element;
use futures::StreamExt;
use std::time::Duration;
use thiserror::Error;

/// Default wait for individual elements (login fields, delete button).
const ELEMENT_WAIT: Duration = Duration::from_secs(30);

/// Wait for the listing container; shorter, since an absent container is how
/// pagination normally ends.
const LISTING_WAIT: Duration = Duration::from_secs(10);

/// Wait for the native confirm dialog after clicking delete.
const DIALOG_WAIT: Duration = Duration::from_secs(5);

// The site's markup contract. Version-fragile by nature.
const USERNAME_FIELD: &str = "input[name='username']";
const PASSWORD_FIELD: &str = "input[name='password']";
const LISTING_CONTAINER: &str = ".post-list";
const LISTING_ROWS: &str = "ul.post-list > li";
const ROW_TITLE: &str = "p.title";
const ROW_ANCHOR: &str = "a";
const DELETE_BUTTON: &str = "button.delete";

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("username must not be empty")]
    EmptyUsername,

    #[error("password must not be empty")]
    EmptyPassword,

    #[error("{field} field not found on the login page")]
    FieldMissing { field: &'static str },

    #[error("login failed or post list not found")]
    MarkerMissing,

    #[error(transparent)]
    Browser(#[from] BrowserError),
}

/// Reject empty credentials before any browser work happens.
pub fn validate_credentials(username: &str, password: &str) -> Result<(), LoginError> {
    if username.trim().is_empty() {
        return Err(LoginError::EmptyUsername);
    }
    if password.trim().is_empty() {
        return Err(LoginError::EmptyPassword);
    }
    Ok(())
}

/// A launched browser pointed at one orbi.kr account's pages.
pub struct ForumClient {
    session: ForumSession,
    config: SweepConfig,
}

impl ForumClient {
    /// Launch the browser for the configured site.
    pub async fn launch(config: SweepConfig) -> Result<Self, BrowserError> {
        let session = ForumSession::launch(config.headless).await?;
        Ok(Self { session, config })
    }

    /// Close the underlying browser.
    pub async fn close(self) {
        self.session.close().await;
    }

    /// Submit the login form and verify the listing marker appears.
    ///
    /// On success the browser is left on the listing page. No retry on
    /// failure; the caller decides what to tell the user.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), LoginError> {
        validate_credentials(username, password)?;

        self.session.goto(&self.config.login_url).await?;

        let Some(user_field) = self.session.wait_for_element(USERNAME_FIELD, ELEMENT_WAIT).await
        else {
            return Err(LoginError::FieldMissing { field: "username" });
        };
        type_into(&user_field, username).await?;

        let Some(pw_field) = self.session.wait_for_element(PASSWORD_FIELD, ELEMENT_WAIT).await
        else {
            return Err(LoginError::FieldMissing { field: "password" });
        };
        type_into(&pw_field, password).await?;
        pw_field
            .press_key("Enter")
            .await
            .map_err(BrowserError::from)?;

        if self
            .session
            .wait_for_element(LISTING_CONTAINER, ELEMENT_WAIT)
            .await
            .is_none()
        {
            return Err(LoginError::MarkerMissing);
        }

        tracing::info!("login successful");
        Ok(())
    }

    fn listing_url(&self, page: u32) -> String {
        format!("{}/my/post?page={page}", self.config.base_url)
    }

    fn modify_url(&self, id: &str) -> String {
        format!("{}/modify/{id}", self.config.base_url)
    }

    /// Report what one row structurally contains. Only the title element's
    /// absence is a structural signal; everything else degrades to values the
    /// scrape step skips.
    async fn scrape_row(row: &Element) -> RawRow {
        let Ok(title_element) = row.find_element(ROW_TITLE).await else {
            return RawRow::MissingTitle;
        };

        let title = title_element
            .inner_text()
            .await
            .ok()
            .flatten()
            .unwrap_or_default();

        let href = match row.find_element(ROW_ANCHOR).await {
            Ok(anchor) => anchor.attribute("href").await.ok().flatten(),
            Err(_) => None,
        };

        RawRow::Intact { title, href }
    }

    /// The delete sequence for one post, with errors still propagating;
    /// [`PostDeleter::delete_post`] is the boundary that swallows them.
    async fn try_delete(&self, id: &str) -> Result<DeleteOutcome, BrowserError> {
        // Subscribe before clicking so a dialog that opens instantly is not
        // missed.
        let mut dialogs = self
            .session
            .page()
            .event_listener::<EventJavascriptDialogOpening>()
            .await?;

        self.session.goto(&self.modify_url(id)).await?;

        let Some(button) = self.session.wait_for_element(DELETE_BUTTON, ELEMENT_WAIT).await
        else {
            return Ok(DeleteOutcome::ControlMissing);
        };

        button.click().await?;

        match tokio::time::timeout(DIALOG_WAIT, dialogs.next()).await {
            Ok(Some(dialog)) => {
                tracing::info!(message = %dialog.message, "confirmation dialog detected");
                self.session
                    .page()
                    .execute(HandleJavaScriptDialogParams::new(true))
                    .await?;
                Ok(DeleteOutcome::Confirmed)
            }
            // No dialog within the window. The click may or may not have
            // deleted the post; carry that as Unconfirmed.
            _ => Ok(DeleteOutcome::Unconfirmed),
        }
    }
}

async fn type_into(field: &Element, text: &str) -> Result<(), BrowserError> {
    field.click().await.map_err(BrowserError::from)?;
    field.type_str(text).await.map_err(BrowserError::from)?;
    Ok(())
}

#[async_trait]
impl ListingSource for ForumClient {
    async fn fetch_rows(&self, page: u32) -> Result<ListingPage, BrowserError> {
        self.session.goto(&self.listing_url(page)).await?;

        if self
            .session
            .wait_for_element(LISTING_CONTAINER, LISTING_WAIT)
            .await
            .is_none()
        {
            return Ok(ListingPage::MissingContainer);
        }

        // The container is already confirmed present, so "no rows resolved"
        // is a legitimate empty page, not a failure.
        let elements = self
            .session
            .page()
            .find_elements(LISTING_ROWS)
            .await
            .unwrap_or_default();

        let mut rows = Vec::with_capacity(elements.len());
        for element in &elements {
            rows.push(Self::scrape_row(element).await);
        }

        Ok(ListingPage::Rows(rows))
    }
}

#[async_trait]
impl PostDeleter for ForumClient {
    async fn delete_post(&self, id: &str) -> DeleteOutcome {
        tracing::info!(id, "attempting to delete post");
        match self.try_delete(id).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(id, error = %e, "delete sequence failed");
                DeleteOutcome::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_username() {
        assert!(matches!(
            validate_credentials("", "hunter2"),
            Err(LoginError::EmptyUsername)
        ));
        assert!(matches!(
            validate_credentials("   ", "hunter2"),
            Err(LoginError::EmptyUsername)
        ));
    }

    #[test]
    fn rejects_empty_password() {
        assert!(matches!(
            validate_credentials("someone", ""),
            Err(LoginError::EmptyPassword)
        ));
        assert!(matches!(
            validate_credentials("someone", "  "),
            Err(LoginError::EmptyPassword)
        ));
    }

    #[test]
    fn accepts_non_empty_credentials() {
        assert!(validate_credentials("someone", "hunter2").is_ok());
    }
}
