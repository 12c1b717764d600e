//! Release metadata.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Notes used when a release was published without a body.
pub(crate) const EMPTY_NOTES: &str = "No release notes provided";

/// A published release of the monitored repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Release {
    /// Identifier unique within the repository; this is what the seen-set stores.
    pub id: String,

    /// Git tag (e.g., "v1.14.0").
    pub tag: String,

    /// Display title, falling back to the tag when the release has no name.
    pub title: String,

    /// Release notes body.
    pub notes: String,

    /// Link to the release page.
    pub url: String,

    /// Publication time, if GitHub reports one.
    pub published_at: Option<DateTime<Utc>>,

    /// Whether the release is marked as a pre-release.
    pub prerelease: bool,
}

impl Release {
    /// Converts a GitHub release, returning `None` for drafts.
    pub(crate) fn from_github(release: octocrab::models::repos::Release) -> Option<Self> {
        if release.draft {
            return None;
        }

        let title = release
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| release.tag_name.clone());
        let notes = release
            .body
            .filter(|body| !body.trim().is_empty())
            .unwrap_or_else(|| EMPTY_NOTES.to_string());

        Some(Self {
            id: release.id.to_string(),
            tag: release.tag_name,
            title,
            notes,
            url: release.html_url.to_string(),
            published_at: release.published_at,
            prerelease: release.prerelease,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn github_release(overrides: Value) -> octocrab::models::repos::Release {
        let base = "https://api.github.com/repos/ethereum/go-ethereum/releases/150000001";
        let mut release = json!({
            "url": base,
            "html_url": "https://github.com/ethereum/go-ethereum/releases/tag/v1.14.0",
            "assets_url": format!("{base}/assets"),
            "upload_url": "https://uploads.github.com/repos/ethereum/go-ethereum/releases/150000001/assets{?name,label}",
            "tarball_url": null,
            "zipball_url": null,
            "id": 150000001,
            "node_id": "RE_kwDOAAAAAAAAAAA",
            "tag_name": "v1.14.0",
            "target_commitish": "master",
            "name": "Matriarch (v1.14.0)",
            "body": "Hard fork: new consensus rules",
            "draft": false,
            "prerelease": false,
            "created_at": "2024-05-01T10:00:00Z",
            "published_at": "2024-05-01T12:00:00Z",
            "author": null,
            "assets": []
        });
        if let (Some(target), Value::Object(changes)) = (release.as_object_mut(), overrides) {
            target.extend(changes);
        }
        serde_json::from_value(release).unwrap()
    }

    #[test]
    fn maps_published_release() {
        let release = Release::from_github(github_release(json!({}))).unwrap();

        assert_eq!(release.id, "150000001");
        assert_eq!(release.tag, "v1.14.0");
        assert_eq!(release.title, "Matriarch (v1.14.0)");
        assert_eq!(release.notes, "Hard fork: new consensus rules");
        assert_eq!(
            release.url,
            "https://github.com/ethereum/go-ethereum/releases/tag/v1.14.0"
        );
        assert_eq!(
            release.published_at.map(|at| at.to_rfc3339()),
            Some("2024-05-01T12:00:00+00:00".to_string())
        );
        assert!(!release.prerelease);
    }

    #[test]
    fn skips_drafts() {
        assert!(Release::from_github(github_release(json!({ "draft": true }))).is_none());
    }

    #[test]
    fn title_falls_back_to_tag() {
        for name in [Value::Null, json!(""), json!("   ")] {
            let release = Release::from_github(github_release(json!({ "name": name }))).unwrap();
            assert_eq!(release.title, "v1.14.0");
        }
    }

    #[test]
    fn missing_notes_get_placeholder() {
        for body in [Value::Null, json!(""), json!("\n  \n")] {
            let release = Release::from_github(github_release(json!({ "body": body }))).unwrap();
            assert_eq!(release.notes, EMPTY_NOTES);
        }
    }

    #[test]
    fn keeps_prerelease_flag_and_missing_publish_time() {
        let release = Release::from_github(github_release(json!({
            "prerelease": true,
            "published_at": null
        })))
        .unwrap();

        assert!(release.prerelease);
        assert!(release.published_at.is_none());
    }
}
