//! Professor dashboard API endpoints
//!
//! Typed client for the Drive-backed subject management surface: subject
//! CRUD, file listing/upload/rename/delete, Drive sync, knowledge-base
//! updates, and the Google Drive connection endpoints.

use crate::api::client::ApiClient;
use crate::error::ClientError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A Drive-backed subject owned by the professor
#[derive(Debug, Clone, Deserialize)]
pub struct DriveSubject {
    /// Subject unique identifier
    pub id: i64,
    /// Subject display name
    pub name: String,
    /// Optional free-form description
    #[serde(default)]
    pub description: Option<String>,
    /// ID of the backing Google Drive folder
    pub drive_folder_id: String,
}

/// A file stored in a subject's Drive folder
#[derive(Debug, Clone, Deserialize)]
pub struct DriveFile {
    /// Drive file identifier
    pub id: String,
    /// File name
    pub name: String,
    /// MIME type reported by Drive
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    /// File size in bytes
    #[serde(default)]
    pub size: Option<u64>,
    /// Last modification time
    #[serde(rename = "modifiedTime", default)]
    pub modified_time: Option<DateTime<Utc>>,
    /// System files (e.g. the FAQ sheet) cannot be deleted or renamed
    #[serde(rename = "isSystemFile", default)]
    pub is_system_file: bool,
}

/// One page of a subject's file listing
#[derive(Debug, Deserialize)]
pub struct FileListing {
    /// Files on this page
    pub files: Vec<DriveFile>,
    /// Total number of pages for the current search
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
    /// Page returned (1-based)
    #[serde(rename = "currentPage")]
    pub current_page: u32,
}

#[derive(Debug, Deserialize)]
struct DriveSubjectsResponse {
    subjects: Vec<DriveSubject>,
}

#[derive(Debug, Serialize)]
struct CreateSubjectRequest<'a> {
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct UpdateSubjectRequest<'a> {
    name: &'a str,
    description: &'a str,
}

#[derive(Debug, Serialize)]
struct RenameFileRequest<'a> {
    new_name: &'a str,
}

/// Response from `GET /professor/google/auth/start`
#[derive(Debug, Deserialize)]
pub struct AuthStart {
    /// URL to open for the Google OAuth consent flow
    pub auth_url: String,
}

/// Response from `GET /professor/google/status`
#[derive(Debug, Deserialize)]
pub struct DriveStatus {
    /// Whether a Drive connection is established
    pub connected: bool,
}

/// Client for the `/professor/*` endpoints
#[derive(Debug, Clone)]
pub struct ProfessorApi {
    client: ApiClient,
}

impl ProfessorApi {
    /// Wrap a shared [`ApiClient`]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// List the professor's Drive-backed subjects
    pub async fn subjects(&self) -> Result<Vec<DriveSubject>, ClientError> {
        let response: DriveSubjectsResponse =
            self.client.get_json("/professor/drive/subjects").await?;
        Ok(response.subjects)
    }

    /// Create a subject (and its Drive folder); requires a connected Drive
    pub async fn create_subject(&self, name: &str) -> Result<(), ClientError> {
        self.client
            .post_json_unit("/professor/drive/subjects", &CreateSubjectRequest { name })
            .await
    }

    /// Update a subject's name and description
    pub async fn update_subject(
        &self,
        subject_id: i64,
        name: &str,
        description: &str,
    ) -> Result<(), ClientError> {
        let _: serde_json::Value = self
            .client
            .put_json(
                &format!("/professor/drive/subjects/{}", subject_id),
                &UpdateSubjectRequest { name, description },
            )
            .await?;
        Ok(())
    }

    /// Delete a subject and its Drive folder
    pub async fn delete_subject(&self, subject_id: i64) -> Result<(), ClientError> {
        self.client
            .delete(&format!("/professor/drive/subjects/{}", subject_id))
            .await
    }

    /// List files in a subject's Drive folder, paginated and searchable
    pub async fn files(
        &self,
        subject_id: i64,
        page: u32,
        search: &str,
    ) -> Result<FileListing, ClientError> {
        self.client
            .get_json_with_query(
                &format!("/professor/drive/subjects/{}/files", subject_id),
                &[("page", page.to_string()), ("search", search.to_string())],
            )
            .await
    }

    /// Upload a file into a subject's Drive folder
    pub async fn upload_file(
        &self,
        subject_id: i64,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<(), ClientError> {
        let part = reqwest::multipart::Part::bytes(contents).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);
        self.client
            .post_multipart(
                &format!("/professor/drive/subjects/{}/upload", subject_id),
                form,
            )
            .await
    }

    /// Rename a Drive file
    pub async fn rename_file(&self, file_id: &str, new_name: &str) -> Result<(), ClientError> {
        let _: serde_json::Value = self
            .client
            .put_json(
                &format!("/professor/drive/files/{}/rename", file_id),
                &RenameFileRequest { new_name },
            )
            .await?;
        Ok(())
    }

    /// Remove a file from a subject's Drive folder
    pub async fn delete_file(&self, file_id: &str) -> Result<(), ClientError> {
        self.client
            .delete(&format!("/professor/drive/files/{}", file_id))
            .await
    }

    /// Synchronize the subject's Drive folder with the backend
    pub async fn sync(&self, subject_id: i64) -> Result<(), ClientError> {
        self.client
            .post_unit(&format!("/professor/drive/subjects/{}/sync", subject_id))
            .await
    }

    /// Rebuild the subject's knowledge base from its synced files
    pub async fn update_knowledge_base(&self, subject_id: i64) -> Result<(), ClientError> {
        self.client
            .post_unit(&format!("/professor/subjects/{}/knowledge-base", subject_id))
            .await
    }

    /// Sync files and then rebuild the knowledge base
    ///
    /// The dashboard's "Save to KB" action: both steps must succeed.
    pub async fn sync_and_update_knowledge_base(&self, subject_id: i64) -> Result<(), ClientError> {
        self.sync(subject_id).await?;
        self.update_knowledge_base(subject_id).await
    }

    /// Begin the Google Drive OAuth flow; returns the consent URL
    pub async fn auth_start(&self) -> Result<AuthStart, ClientError> {
        self.client.get_json("/professor/google/auth/start").await
    }

    /// Check whether a Drive connection is established
    pub async fn drive_status(&self) -> Result<DriveStatus, ClientError> {
        self.client.get_json("/professor/google/status").await
    }
}
