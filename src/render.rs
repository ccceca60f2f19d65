//! Tera rendering of the draft release and its chat announcement.
use log::*;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use tera::{Context, Tera};

use crate::{
    analyzer::priority::PriorityLevel, chat::ChatMessage, config::ReleaseConfig,
    error::Result,
};

static BOLD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(?<text>.+?)\*\*").unwrap());

const ANNOUNCEMENT_PLAIN: &str = "\
***{{ name }} {{ version }} has been tagged.***
Draft release created: {{ url }}

{{ notes }}";

const ANNOUNCEMENT_HTML: &str = "\
<strong>{{ name }} {{ version }} has been tagged.</strong><br />\
Draft release created: <a href=\"{{ url }}\">{{ url }}</a><br /><br />\
{{ notes | safe }}";

/// Values available to the release title and body templates.
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseContext {
    /// Display name of the primary repository
    pub name: String,
    /// Version shown in the title, the release tag as given
    pub version: String,
    pub tag: String,
    pub priority: PriorityLevel,
    pub banner: String,
    /// Composed release body including the banner
    pub notes: String,
}

/// Rendered draft release title and body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedRelease {
    pub title: String,
    pub body: String,
}

/// Renders the configured title and body templates.
pub fn render_release(
    config: &ReleaseConfig,
    context: &ReleaseContext,
) -> Result<RenderedRelease> {
    let mut tera = Tera::default();
    tera.add_raw_template("title", &config.title)?;
    tera.add_raw_template("body", &config.body)?;

    let context = Context::from_serialize(context)?;

    Ok(RenderedRelease {
        title: tera.render("title", &context)?.trim().to_string(),
        body: tera.render("body", &context)?,
    })
}

/// Escapes release notes for an HTML message, keeping bold markers and line
/// breaks.
fn notes_html(notes: &str) -> String {
    BOLD_REGEX
        .replace_all(&tera::escape_html(notes), "<strong>$text</strong>")
        .replace('\n', "<br />")
}

/// Builds the plain and HTML chat announcement for a published draft. Both
/// carry the full release notes.
pub fn render_announcement(
    release: &ReleaseContext,
    url: &str,
) -> Result<ChatMessage> {
    let mut context = Context::new();
    context.insert("name", &release.name);
    context.insert("version", &release.version);
    context.insert("url", url);
    context.insert("notes", &release.notes);

    let body = Tera::one_off(ANNOUNCEMENT_PLAIN, &context, false)?;

    context.insert("notes", &notes_html(&release.notes));
    let formatted_body = Tera::one_off(ANNOUNCEMENT_HTML, &context, true)?;

    Ok(ChatMessage {
        body,
        formatted_body,
    })
}

/// Whether a release tag names a semver pre-release. Tags that are not
/// semver versions are treated as regular releases.
pub fn is_prerelease(tag: &str) -> bool {
    let version = tag.strip_prefix('v').unwrap_or(tag);

    match semver::Version::parse(version) {
        Ok(version) => !version.pre.is_empty(),
        Err(err) => {
            warn!("tag {tag} is not a semver version ({err}): not a prerelease");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> ReleaseContext {
        ReleaseContext {
            name: "Polkadot".into(),
            version: "v0.9.3".into(),
            tag: "v0.9.3".into(),
            priority: PriorityLevel::High,
            banner: "Upgrade priority: **HIGH** #12 <script>".into(),
            notes: "Upgrade priority: **HIGH** #12\n\n* Fix (#12)".into(),
        }
    }

    #[test]
    fn renders_default_templates() {
        let rendered =
            render_release(&ReleaseConfig::default(), &context()).unwrap();

        assert_eq!(rendered.title, "Polkadot v0.9.3");
        assert_eq!(rendered.body, context().notes);
    }

    #[test]
    fn renders_custom_templates() {
        let config = ReleaseConfig {
            title: "{{ name }} {{ version }} ({{ priority }})".into(),
            body: "# {{ tag }}\n\n{{ notes }}".into(),
            ..Default::default()
        };

        let rendered = render_release(&config, &context()).unwrap();

        assert_eq!(rendered.title, "Polkadot v0.9.3 (high)");
        assert!(rendered.body.starts_with("# v0.9.3\n\nUpgrade priority"));
    }

    #[test]
    fn invalid_template_is_a_template_error() {
        let config = ReleaseConfig {
            title: "{{ name".into(),
            ..Default::default()
        };

        let result = render_release(&config, &context());

        assert!(matches!(
            result,
            Err(crate::error::HeraldError::TemplateError(_))
        ));
    }

    #[test]
    fn announcement_carries_escaped_notes() {
        let release = ReleaseContext {
            notes: "Upgrade priority: **HIGH** #12\n\n\
                    * Fix <script> handling (#12)"
                .into(),
            ..context()
        };

        let message = render_announcement(
            &release,
            "https://github.com/paritytech/polkadot/releases/1",
        )
        .unwrap();

        assert!(
            message
                .body
                .starts_with("***Polkadot v0.9.3 has been tagged.***")
        );
        assert!(message.body.ends_with(&release.notes));
        assert!(
            message
                .formatted_body
                .contains("<strong>HIGH</strong> #12<br /><br />")
        );
        assert!(
            message
                .formatted_body
                .contains("* Fix &lt;script&gt; handling (#12)")
        );
        assert!(message.formatted_body.contains("<a href=\""));
        assert!(!message.formatted_body.contains("<script>"));
    }

    #[test]
    fn detects_prereleases() {
        assert!(is_prerelease("v1.0.0-rc1"));
        assert!(is_prerelease("0.9.3-beta.2"));
        assert!(!is_prerelease("v0.9.3"));
        assert!(!is_prerelease("polkadot-2021-11"));
    }
}
