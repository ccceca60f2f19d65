//! Publishes the composed release as a draft and announces it.
use log::*;

use crate::{
    chat::Notifier,
    cli::RangeArgs,
    command::common::{self, PreparedRelease},
    config::Config,
    error::Result,
    forge::{manager::ForgeManager, request::CreateReleaseRequest},
    render,
};

/// Creates the draft release on the primary repository and posts the chat
/// announcement. Returns the release URL.
///
/// Nothing is published when preparation fails. A failed announcement is
/// logged and does not undo the published draft.
pub async fn execute(
    primary: &ForgeManager,
    dependency: &ForgeManager,
    notifier: Option<&dyn Notifier>,
    range: &RangeArgs,
    config: &Config,
) -> Result<String> {
    let prepared =
        common::prepare_release(primary, dependency, range, config).await?;

    let url = primary
        .create_draft_release(CreateReleaseRequest {
            tag: prepared.tag.clone(),
            title: prepared.rendered.title.clone(),
            body: prepared.rendered.body.clone(),
            prerelease: prepared.prerelease,
        })
        .await?;

    info!("created draft release {}: {url}", prepared.tag);

    match notifier {
        Some(notifier) => {
            if let Err(err) = announce(notifier, &prepared, &url).await {
                error!(
                    "failed to announce {}: {err}: draft release remains at {url}",
                    prepared.tag
                );
            }
        }
        None => info!("no chat room configured: skipping announcement"),
    }

    Ok(url)
}

async fn announce(
    notifier: &dyn Notifier,
    prepared: &PreparedRelease,
    url: &str,
) -> Result<()> {
    let message = render::render_announcement(&prepared.context, url)?;
    notifier.post_message(&message).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        chat::MockNotifier,
        error::HeraldError,
        forge::{request::TagVerification, traits::MockForge},
        test_helpers::{manager_with_path, range_args},
    };

    fn primary_forge() -> MockForge {
        let mut mock = MockForge::new();
        mock.expect_get_tag_verification().returning(|_| {
            Ok(TagVerification {
                annotated: true,
                verified: true,
                reason: None,
            })
        });
        mock.expect_get_commit_summaries()
            .returning(|_| Ok(vec!["Fix block import (#11)".into()]));
        mock.expect_get_labels()
            .returning(|_| Ok(vec!["C9-critical".into()]));
        mock
    }

    fn dependency_forge() -> MockForge {
        let mut mock = MockForge::new();
        mock.expect_get_commit_summaries()
            .returning(|_| Ok(vec!["Faster trie (#5000)".into()]));
        mock.expect_get_labels()
            .returning(|_| Ok(vec!["B5-clientnoteworthy".into()]));
        mock
    }

    async fn run(
        primary: MockForge,
        notifier: Option<&dyn Notifier>,
    ) -> Result<String> {
        execute(
            &manager_with_path(primary, "paritytech", "polkadot"),
            &manager_with_path(dependency_forge(), "paritytech", "substrate"),
            notifier,
            &range_args(Some(("aaa", "bbb"))),
            &Config::default(),
        )
        .await
    }

    #[test_log::test(tokio::test)]
    async fn publishes_draft_and_announces_it() {
        let mut primary = primary_forge();
        primary
            .expect_create_draft_release()
            .withf(|req| {
                req.tag == "v0.9.3"
                    && req.title == "polkadot v0.9.3"
                    && req.body.contains("## Dependency changes\n\n### Client")
                    && !req.prerelease
            })
            .times(1)
            .returning(|_| Ok("https://github.com/p/r/releases/1".into()));

        let mut notifier = MockNotifier::new();
        notifier
            .expect_post_message()
            .withf(|message| {
                message.body.contains("https://github.com/p/r/releases/1")
                    && message.body.contains("* Fix block import (#11)")
                    && message.body.contains("### Client\n\n* Faster trie")
                    && message.formatted_body.contains("Fix block import (#11)")
            })
            .times(1)
            .returning(|_| Ok(()));

        let url = run(primary, Some(&notifier)).await.unwrap();

        assert_eq!(url, "https://github.com/p/r/releases/1");
    }

    #[tokio::test]
    async fn publish_failure_skips_announcement() {
        let mut primary = primary_forge();
        primary
            .expect_create_draft_release()
            .returning(|_| Err(HeraldError::forge("403 forbidden")));

        let mut notifier = MockNotifier::new();
        notifier.expect_post_message().never();

        let result = run(primary, Some(&notifier)).await;

        assert!(matches!(result, Err(HeraldError::PublishFailure(_))));
    }

    #[tokio::test]
    async fn announcement_failure_keeps_release() {
        let mut primary = primary_forge();
        primary
            .expect_create_draft_release()
            .times(1)
            .returning(|_| Ok("https://github.com/p/r/releases/2".into()));

        let mut notifier = MockNotifier::new();
        notifier
            .expect_post_message()
            .times(1)
            .returning(|_| Err(HeraldError::notification("timeout")));

        let url = run(primary, Some(&notifier)).await.unwrap();

        assert_eq!(url, "https://github.com/p/r/releases/2");
    }

    #[tokio::test]
    async fn publishes_without_notifier() {
        let mut primary = primary_forge();
        primary
            .expect_create_draft_release()
            .times(1)
            .returning(|_| Ok("https://github.com/p/r/releases/3".into()));

        assert!(run(primary, None).await.is_ok());
    }

    #[tokio::test]
    async fn unsigned_tag_publishes_nothing() {
        let mut primary = MockForge::new();
        primary
            .expect_get_tag_verification()
            .returning(|_| Ok(TagVerification::default()));
        primary.expect_get_commit_summaries().never();
        primary.expect_create_draft_release().never();

        let mut notifier = MockNotifier::new();
        notifier.expect_post_message().never();

        let result = run(primary, Some(&notifier)).await;

        assert!(matches!(result, Err(HeraldError::UnsignedTag(_))));
    }
}
