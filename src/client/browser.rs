//! CMIS browser-binding client.
//!
//! The browser binding is the JSON face of a CMIS 1.1 repository: the
//! service document enumerates repositories, and each repository's root
//! folder URL answers object, children, and content queries selected by
//! the `cmisselector` parameter.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use futures::{StreamExt, TryStreamExt};
use reqwest::header;
use serde_json::Value;
use url::Url;

use crate::error::{CmisError, Result};
use crate::models::{Document, Folder, OtherObject, RepositoryInfo, RepositoryObject};
use crate::session::SessionParameters;

use super::{ChildPage, ContentStream, RepositoryClient};

/// Talks to one CMIS service endpoint over the browser binding.
///
/// Holds credentials and the endpoint address only, so a single client
/// can serve any number of concurrent requests.
pub struct BrowserBindingClient {
    http: reqwest::Client,
    service_url: Url,
    username: String,
    password: String,
    accept_language: String,
}

impl BrowserBindingClient {
    /// Build a client from validated session parameters.
    pub fn new(params: &SessionParameters, user_agent: &str, timeout: Duration) -> Result<Self> {
        // A total request timeout would cut long downloads short, so
        // bound connect and read inactivity instead.
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            http,
            service_url: params.service_url.clone(),
            username: params.username.clone(),
            password: params.password.clone(),
            accept_language: params.accept_language(),
        })
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.http
            .get(url)
            .basic_auth(&self.username, Some(&self.password))
            .header(header::ACCEPT_LANGUAGE, self.accept_language.as_str())
    }

    async fn get_json(
        &self,
        url: &str,
        query: &[(&str, String)],
        object_id: Option<&str>,
    ) -> Result<Value> {
        tracing::debug!("GET {} {:?}", url, query);
        let response = self.get(url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_fault(status.as_u16(), &body, object_id, false));
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl RepositoryClient for BrowserBindingClient {
    async fn repository_infos(&self) -> Result<Vec<RepositoryInfo>> {
        let value = self.get_json(self.service_url.as_str(), &[], None).await?;
        let entries = value.as_object().ok_or_else(|| {
            CmisError::InvalidResponse("service document is not a JSON object".to_string())
        })?;

        // Service-document order defines which repository counts as first.
        let mut repositories = Vec::with_capacity(entries.len());
        for (id, entry) in entries {
            repositories.push(parse_repository_info(id, entry)?);
        }
        Ok(repositories)
    }

    async fn object(
        &self,
        repository: &RepositoryInfo,
        object_id: &str,
    ) -> Result<RepositoryObject> {
        let query = [
            ("cmisselector", "object".to_string()),
            ("objectId", object_id.to_string()),
            ("succinct", "true".to_string()),
        ];
        let value = self
            .get_json(&repository.root_folder_url, &query, Some(object_id))
            .await?;
        parse_object(&value)
    }

    async fn children_page(
        &self,
        repository: &RepositoryInfo,
        folder_id: &str,
        skip_count: u64,
        max_items: u64,
    ) -> Result<ChildPage> {
        let query = [
            ("cmisselector", "children".to_string()),
            ("objectId", folder_id.to_string()),
            ("succinct", "true".to_string()),
            ("skipCount", skip_count.to_string()),
            ("maxItems", max_items.to_string()),
        ];
        let value = self
            .get_json(&repository.root_folder_url, &query, Some(folder_id))
            .await?;

        let objects = match value.get("objects").and_then(Value::as_array) {
            Some(entries) => {
                let mut objects = Vec::with_capacity(entries.len());
                for entry in entries {
                    // children entries nest the object under an "object" key
                    let object = entry.get("object").unwrap_or(entry);
                    objects.push(parse_object(object)?);
                }
                objects
            }
            None => Vec::new(),
        };

        Ok(ChildPage {
            objects,
            has_more: value
                .get("hasMoreItems")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            num_items: value.get("numItems").and_then(Value::as_u64),
        })
    }

    async fn content(
        &self,
        repository: &RepositoryInfo,
        document_id: &str,
    ) -> Result<ContentStream> {
        let query = [
            ("cmisselector", "content".to_string()),
            ("objectId", document_id.to_string()),
        ];
        tracing::debug!("GET {} content for {}", repository.root_folder_url, document_id);
        let response = self
            .get(&repository.root_folder_url)
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_fault(status.as_u16(), &body, Some(document_id), true));
        }

        let mime_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let filename = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_disposition_filename);
        let length = response.content_length();

        Ok(ContentStream {
            mime_type,
            filename,
            length,
            stream: response.bytes_stream().map_err(CmisError::from).boxed(),
        })
    }
}

/// Translate a CMIS fault into an error.
///
/// Faults arrive as `{"exception": "...", "message": "..."}`. An
/// objectNotFound fault (or a bare 404) becomes [`CmisError::NotFound`];
/// a constraint fault on a content request means the document exists but
/// has no content stream.
fn map_fault(status: u16, body: &str, object_id: Option<&str>, content_request: bool) -> CmisError {
    let value: Option<Value> = serde_json::from_str(body).ok();
    let exception = value
        .as_ref()
        .and_then(|v| v.get("exception"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let message = value
        .as_ref()
        .and_then(|v| v.get("message"))
        .and_then(Value::as_str)
        .unwrap_or(body)
        .trim()
        .to_string();

    if let Some(id) = object_id {
        if exception == "objectNotFound" || (status == 404 && exception.is_empty()) {
            return CmisError::NotFound(id.to_string());
        }
        if content_request && exception == "constraint" {
            return CmisError::MissingContent(id.to_string());
        }
    }

    CmisError::Repository {
        status,
        exception,
        message,
    }
}

fn parse_repository_info(id: &str, value: &Value) -> Result<RepositoryInfo> {
    let root_folder_id = value
        .get("rootFolderId")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            CmisError::InvalidResponse(format!("repository {} has no rootFolderId", id))
        })?;
    let root_folder_url = value
        .get("rootFolderUrl")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            CmisError::InvalidResponse(format!("repository {} has no rootFolderUrl", id))
        })?;

    let str_field = |key: &str| {
        value
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    Ok(RepositoryInfo {
        id: value
            .get("repositoryId")
            .and_then(Value::as_str)
            .unwrap_or(id)
            .to_string(),
        name: str_field("repositoryName").unwrap_or_default(),
        description: str_field("repositoryDescription"),
        vendor: str_field("vendorName"),
        product: str_field("productName"),
        root_folder_id: root_folder_id.to_string(),
        root_folder_url: root_folder_url.to_string(),
    })
}

/// Build a domain object from an object entry with succinct properties.
fn parse_object(value: &Value) -> Result<RepositoryObject> {
    let props = value
        .get("succinctProperties")
        .and_then(Value::as_object)
        .ok_or_else(|| {
            CmisError::InvalidResponse("object entry has no succinctProperties".to_string())
        })?;

    let id = string_prop(props, "cmis:objectId").ok_or_else(|| {
        CmisError::InvalidResponse("object entry has no cmis:objectId".to_string())
    })?;
    // Names must be present; empty is legal (root folders report one).
    let name = string_prop(props, "cmis:name")
        .ok_or_else(|| CmisError::InvalidResponse(format!("object {} has no cmis:name", id)))?;
    let base_type = string_prop(props, "cmis:baseTypeId").unwrap_or_default();

    let object = match base_type.as_str() {
        "cmis:folder" => RepositoryObject::Folder(Folder {
            id,
            name,
            path: string_prop(props, "cmis:path"),
            parent_id: string_prop(props, "cmis:parentId"),
        }),
        "cmis:document" => RepositoryObject::Document(Document {
            id,
            name,
            mime_type: string_prop(props, "cmis:contentStreamMimeType"),
            filename: string_prop(props, "cmis:contentStreamFileName"),
            content_length: u64_prop(props, "cmis:contentStreamLength"),
            last_modified: millis_prop(props, "cmis:lastModificationDate"),
        }),
        _ => RepositoryObject::Other(OtherObject {
            id,
            name,
            base_type,
        }),
    };
    Ok(object)
}

/// Read a succinct property that may be a scalar or a single-element array.
fn string_prop(props: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    match props.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.first().and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

fn u64_prop(props: &serde_json::Map<String, Value>, key: &str) -> Option<u64> {
    match props.get(key)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        Value::Array(items) => items.first().and_then(Value::as_u64),
        _ => None,
    }
}

/// Last-modification dates come through as epoch milliseconds.
fn millis_prop(props: &serde_json::Map<String, Value>, key: &str) -> Option<DateTime<Utc>> {
    let millis = match props.get(key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        Value::Array(items) => items.first().and_then(Value::as_i64),
        _ => None,
    }?;
    Utc.timestamp_millis_opt(millis).single()
}

/// Parse a filename from a Content-Disposition header value.
/// Handles both `filename="name.pdf"` and `filename*=UTF-8''name.pdf`.
fn parse_content_disposition_filename(header: &str) -> Option<String> {
    // filename*= (RFC 5987 encoded) takes precedence
    if let Some(start) = header.find("filename*=") {
        let rest = &header[start + 10..];
        if let Some(quote_start) = rest.find("''") {
            let encoded = rest[quote_start + 2..].split([';', ' ']).next()?;
            if let Ok(decoded) = urlencoding::decode(encoded) {
                let filename = decoded.trim().to_string();
                if !filename.is_empty() {
                    return Some(filename);
                }
            }
        }
    }

    if let Some(start) = header.find("filename=") {
        let rest = &header[start + 9..];
        let filename = if let Some(quoted) = rest.strip_prefix('"') {
            quoted.split('"').next()
        } else {
            rest.split([';', ' ']).next()
        };

        if let Some(name) = filename {
            let name = name.trim().to_string();
            if !name.is_empty() {
                return Some(name);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_folder_object() {
        let value = json!({
            "succinctProperties": {
                "cmis:objectId": "folder-1",
                "cmis:name": "Projects",
                "cmis:baseTypeId": "cmis:folder",
                "cmis:path": "/Projects",
                "cmis:parentId": "root-id"
            }
        });

        let object = parse_object(&value).unwrap();
        match object {
            RepositoryObject::Folder(folder) => {
                assert_eq!(folder.id, "folder-1");
                assert_eq!(folder.name, "Projects");
                assert_eq!(folder.path.as_deref(), Some("/Projects"));
                assert_eq!(folder.parent_id.as_deref(), Some("root-id"));
            }
            other => panic!("expected folder, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_document_object() {
        let value = json!({
            "succinctProperties": {
                "cmis:objectId": "doc-1",
                "cmis:name": "report.pdf",
                "cmis:baseTypeId": "cmis:document",
                "cmis:contentStreamMimeType": "application/pdf",
                "cmis:contentStreamFileName": "report.pdf",
                "cmis:contentStreamLength": 1234,
                "cmis:lastModificationDate": 1395134640000i64
            }
        });

        let object = parse_object(&value).unwrap();
        match object {
            RepositoryObject::Document(doc) => {
                assert_eq!(doc.id, "doc-1");
                assert_eq!(doc.mime_type.as_deref(), Some("application/pdf"));
                assert_eq!(doc.content_length, Some(1234));
                assert!(doc.last_modified.is_some());
            }
            other => panic!("expected document, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_object_with_array_properties() {
        // some servers wrap single-valued properties in arrays
        let value = json!({
            "succinctProperties": {
                "cmis:objectId": ["doc-2"],
                "cmis:name": ["notes.txt"],
                "cmis:baseTypeId": ["cmis:document"],
                "cmis:contentStreamLength": [42]
            }
        });

        let object = parse_object(&value).unwrap();
        assert_eq!(object.id(), "doc-2");
        assert_eq!(object.name(), "notes.txt");
    }

    #[test]
    fn test_parse_unknown_base_type() {
        let value = json!({
            "succinctProperties": {
                "cmis:objectId": "rel-1",
                "cmis:name": "related",
                "cmis:baseTypeId": "cmis:relationship"
            }
        });

        let object = parse_object(&value).unwrap();
        match object {
            RepositoryObject::Other(other) => assert_eq!(other.base_type, "cmis:relationship"),
            other => panic!("expected other, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_object_without_properties_fails() {
        let err = parse_object(&json!({"foo": "bar"})).unwrap_err();
        assert!(matches!(err, CmisError::InvalidResponse(_)));
    }

    #[test]
    fn test_parse_object_without_name_fails() {
        let value = json!({
            "succinctProperties": {
                "cmis:objectId": "folder-9",
                "cmis:baseTypeId": "cmis:folder"
            }
        });

        let err = parse_object(&value).unwrap_err();
        match err {
            CmisError::InvalidResponse(message) => {
                assert!(message.contains("cmis:name"), "message was {}", message)
            }
            other => panic!("expected invalid response, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_object_with_empty_name() {
        // root folders report a present but empty cmis:name
        let value = json!({
            "succinctProperties": {
                "cmis:objectId": "root-id",
                "cmis:name": "",
                "cmis:baseTypeId": "cmis:folder",
                "cmis:path": "/"
            }
        });

        let object = parse_object(&value).unwrap();
        assert!(object.is_folder());
        assert_eq!(object.name(), "");
    }

    #[test]
    fn test_parse_repository_info() {
        let value = json!({
            "repositoryId": "repo-1",
            "repositoryName": "Main Repository",
            "vendorName": "Apache Chemistry",
            "productName": "OpenCMIS InMemory",
            "rootFolderId": "root-id",
            "rootFolderUrl": "http://cmis.example.com/browser/repo-1/root"
        });

        let info = parse_repository_info("repo-1", &value).unwrap();
        assert_eq!(info.id, "repo-1");
        assert_eq!(info.name, "Main Repository");
        assert_eq!(info.root_folder_id, "root-id");
        assert_eq!(info.vendor.as_deref(), Some("Apache Chemistry"));
    }

    #[test]
    fn test_parse_repository_info_requires_root_folder() {
        let err = parse_repository_info("repo-1", &json!({"repositoryId": "repo-1"})).unwrap_err();
        assert!(matches!(err, CmisError::InvalidResponse(_)));
    }

    #[test]
    fn test_map_fault_object_not_found() {
        let body = r#"{"exception":"objectNotFound","message":"Unknown object!"}"#;
        let err = map_fault(404, body, Some("missing-id"), false);
        assert!(matches!(err, CmisError::NotFound(id) if id == "missing-id"));
    }

    #[test]
    fn test_map_fault_bare_404() {
        let err = map_fault(404, "", Some("missing-id"), false);
        assert!(matches!(err, CmisError::NotFound(_)));
    }

    #[test]
    fn test_map_fault_constraint_on_content() {
        let body = r#"{"exception":"constraint","message":"Document has no content!"}"#;
        let err = map_fault(409, body, Some("doc-1"), true);
        assert!(matches!(err, CmisError::MissingContent(id) if id == "doc-1"));
    }

    #[test]
    fn test_map_fault_constraint_elsewhere_is_repository_error() {
        let body = r#"{"exception":"constraint","message":"nope"}"#;
        let err = map_fault(409, body, Some("doc-1"), false);
        assert!(matches!(err, CmisError::Repository { status: 409, .. }));
    }

    #[test]
    fn test_map_fault_unparseable_body() {
        let err = map_fault(500, "<html>Internal Server Error</html>", None, false);
        match err {
            CmisError::Repository {
                status, message, ..
            } => {
                assert_eq!(status, 500);
                assert!(message.contains("Internal Server Error"));
            }
            other => panic!("expected repository error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_content_disposition_quoted() {
        let header = r#"attachment; filename="document.pdf""#;
        assert_eq!(
            parse_content_disposition_filename(header),
            Some("document.pdf".to_string())
        );
    }

    #[test]
    fn test_parse_content_disposition_rfc5987() {
        let header = "attachment; filename*=UTF-8''my%20document.pdf";
        assert_eq!(
            parse_content_disposition_filename(header),
            Some("my document.pdf".to_string())
        );
    }

    #[test]
    fn test_parse_content_disposition_none() {
        assert_eq!(parse_content_disposition_filename("attachment"), None);
    }
}
