//! CI environment detection and run metadata

use serde::Serialize;
use std::collections::HashMap;

/// Environment snapshot the CI helpers read from
pub type Envs = HashMap<String, String>;

/// Whether an environment value is present and not blank
pub fn is_set(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Metadata describing the current CI run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CiMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_sha: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl CiMetadata {
    pub fn is_empty(&self) -> bool {
        *self == CiMetadata::default()
    }
}

/// Recognised CI platform for the given environment
pub fn detect_ci_platform(envs: &Envs) -> Option<&'static str> {
    const MARKERS: [(&str, &str); 4] = [
        ("BITBUCKET_BUILD_NUMBER", "bitbucket"),
        ("CIRCLECI", "circleci"),
        ("GITHUB_ACTIONS", "github"),
        ("GITLAB_CI", "gitlab"),
    ];

    MARKERS
        .iter()
        .find(|(marker, _)| is_set(envs.get(*marker).map(String::as_str)))
        .map(|(_, platform)| *platform)
}

/// Map the CI environment of `platform` to run metadata.
///
/// Unknown platforms produce an empty record.
pub fn ci_metadata(platform: &str, envs: &Envs) -> CiMetadata {
    let var = |key: &str| envs.get(key).cloned();

    match platform {
        "bitbucket" => CiMetadata {
            actor: var("BITBUCKET_COMMIT_AUTHOR"),
            branch: var("BITBUCKET_BRANCH"),
            build: var("BITBUCKET_BUILD_NUMBER"),
            commit_sha: var("BITBUCKET_COMMIT"),
            run: var("BITBUCKET_BUILD_NUMBER"),
            url: var("BITBUCKET_BUILD_URL"),
            ..Default::default()
        },
        "circleci" => CiMetadata {
            actor: var("CIRCLE_USERNAME"),
            branch: var("CIRCLE_BRANCH"),
            build: var("CIRCLE_BUILD_NUM"),
            commit_sha: var("CIRCLE_SHA1"),
            run: var("CIRCLE_WORKFLOW_ID"),
            url: var("CIRCLE_BUILD_URL"),
            ..Default::default()
        },
        "github" => CiMetadata {
            actor: var("GITHUB_ACTOR"),
            attempt: var("GITHUB_RUN_ATTEMPT"),
            branch: var("GITHUB_REF_NAME"),
            build: var("GITHUB_RUN_ID"),
            commit_sha: var("GITHUB_SHA"),
            run: var("GITHUB_RUN_ID"),
            run_number: var("GITHUB_RUN_NUMBER"),
            url: Some(format!(
                "{}/{}/actions/runs/{}",
                var("GITHUB_SERVER_URL").unwrap_or_default(),
                var("GITHUB_REPOSITORY").unwrap_or_default(),
                var("GITHUB_RUN_ID").unwrap_or_default()
            )),
            ..Default::default()
        },
        "gitlab" => CiMetadata {
            actor: var("GITLAB_USER_LOGIN"),
            branch: var("CI_COMMIT_REF_NAME"),
            build: var("CI_PIPELINE_ID"),
            commit_sha: var("CI_COMMIT_SHA"),
            commit_message: var("CI_COMMIT_MESSAGE"),
            run: var("CI_RUNNER_ID"),
            url: var("CI_PROJECT_URL"),
            ..Default::default()
        },
        _ => CiMetadata::default(),
    }
}

/// Snapshot of the process environment
pub fn process_envs() -> Envs {
    std::env::vars().collect()
}
