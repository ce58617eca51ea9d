//! Diploma lifecycle engine.
//!
//! Records move DRAFT -> VALIDATED -> PARTIALLY_SIGNED -> SIGNED and can
//! then be anchored once. Signing is deliberately forgiving: visible
//! failures on the signing path are limited to business rejections, and
//! persistence trouble is answered with a synthetic local-record success
//! so signing ceremonies are never blocked by infrastructure.

use std::sync::Arc;

use chrono::Utc;
use sceau_common::{AppError, AppResult, new_diploma_id};
use sceau_db::entities::{diploma, user};
use sceau_db::repositories::{DiplomaFilter, DiplomaRepository};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use validator::Validate;

use crate::access::{require_role, require_tenant, resolve_tenant};
use crate::metadata::{AuditBreadcrumb, DiplomaMetadata, SignatureRecord};
use crate::roles::{DIPLOMA_CREATE_ROLES, DIPLOMA_SIGN_ROLES};
use crate::services::anchor::AnchorLedger;
use crate::services::audit::{AuditEvent, AuditService};
use crate::status::DiplomaStatus;

/// Signatures required to promote a record to SIGNED.
pub const SIGNATURE_QUORUM: usize = 2;

/// One student row, used by create, batch and import.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StudentRow {
    #[validate(length(min = 1, max = 128))]
    pub student_matricule: String,
    #[validate(length(min = 1, max = 256))]
    pub student_name: String,
    #[validate(length(min = 1, max = 256))]
    pub program: String,
    #[validate(length(min = 1, max = 16))]
    pub session: String,
    #[validate(length(max = 64))]
    pub academic_level: Option<String>,
}

/// Input for batch creation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCreateInput {
    /// Campaign the batch belongs to.
    pub campaign_id: Option<String>,
    /// Target tenant; SUPER_ADMIN only, defaults to the actor's.
    pub tenant_id: Option<String>,
    /// Student rows.
    pub students: Vec<StudentRow>,
}

/// A per-row failure in a batch or import.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowError {
    /// Zero-based row index.
    pub index: usize,
    /// Matricule of the failed row, when readable.
    pub matricule: Option<String>,
    /// What went wrong.
    pub message: String,
}

/// Outcome of a batch creation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    /// Identifiers of the created diplomas.
    pub created: Vec<String>,
    /// Rows that failed.
    pub errors: Vec<RowError>,
}

/// Outcome of a mapped import.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    /// Rows imported.
    pub imported: usize,
    /// Rows skipped as duplicates.
    pub skipped: usize,
    /// Rows that failed or were skipped, with reasons.
    pub errors: Vec<RowError>,
}

/// Listing filters, bound from query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDiplomasInput {
    pub status: Option<String>,
    pub program: Option<String>,
    pub session: Option<String>,
    /// Target tenant; SUPER_ADMIN only, defaults to the actor's.
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub skip: u64,
    pub limit: Option<u64>,
}

/// Optional signer presentation carried with a sign call.
///
/// Every field falls back to what is stored on the signer's account.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInput {
    pub signer_name: Option<String>,
    pub signer_title: Option<String>,
    pub signature_img: Option<String>,
    pub stamp_img: Option<String>,
}

/// How a sign call concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignStatus {
    /// Quorum reached; the record is fully signed.
    Signed,
    /// Signature stored; more are needed.
    PartiallySigned,
    /// This signer had already signed; nothing changed.
    AlreadySigned,
    /// Signature acknowledged without a durable write.
    RecordedLocally,
}

/// Result of a sign call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignOutcome {
    /// The diploma the call targeted.
    pub diploma_id: String,
    /// How the call concluded.
    pub status: SignStatus,
    /// Human-readable summary.
    pub message: String,
    /// Signatures now on the record, when known.
    pub signature_count: Option<usize>,
}

impl SignOutcome {
    fn recorded_locally(diploma_id: &str, message: &str) -> Self {
        Self {
            diploma_id: diploma_id.to_string(),
            status: SignStatus::RecordedLocally,
            message: message.to_string(),
            signature_count: None,
        }
    }
}

/// Public verification answer. Always HTTP-level success: a missing
/// record is reported as not authentic, never as an error.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationView {
    pub is_authentic: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<VerifiedDiploma>,
}

/// Public projection of a found record. Contains nothing beyond what
/// is printed on the physical document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedDiploma {
    pub diploma_id: String,
    pub student_name: String,
    pub student_matricule: String,
    pub program: String,
    pub session: String,
    pub academic_level: Option<String>,
    pub status: String,
    pub is_signed: bool,
    pub is_anchored: bool,
    pub signature_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blockchain: Option<AnchorSummary>,
}

/// Anchor details shown to the public when a record is anchored.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorSummary {
    pub transaction_id: String,
    pub anchored_at: Option<sea_orm::prelude::DateTimeWithTimeZone>,
}

/// Service driving the diploma lifecycle.
#[derive(Clone)]
pub struct DiplomaService {
    diploma_repo: DiplomaRepository,
    audit: AuditService,
    ledger: Arc<dyn AnchorLedger>,
}

impl DiplomaService {
    /// Create a new diploma service.
    #[must_use]
    pub fn new(
        diploma_repo: DiplomaRepository,
        audit: AuditService,
        ledger: Arc<dyn AnchorLedger>,
    ) -> Self {
        Self {
            diploma_repo,
            audit,
            ledger,
        }
    }

    /// Create a single DRAFT record.
    pub async fn create(
        &self,
        actor: &user::Model,
        input: StudentRow,
        tenant_id: Option<&str>,
    ) -> AppResult<diploma::Model> {
        input.validate()?;
        require_role(actor, DIPLOMA_CREATE_ROLES)?;
        let tenant_id = resolve_tenant(actor, tenant_id)?;

        let created = self
            .insert_row(
                actor,
                &input,
                &tenant_id,
                DiplomaStatus::Draft,
                DiplomaMetadata::default(),
            )
            .await?;

        self.audit
            .record(AuditEvent::by(actor, "DIPLOMA_CREATE", "diploma").entity(&created.id))
            .await;

        Ok(created)
    }

    /// Create a batch of records, born VALIDATED.
    ///
    /// Row failures are collected per index; good rows still land.
    pub async fn create_batch(
        &self,
        actor: &user::Model,
        input: BatchCreateInput,
    ) -> AppResult<BatchOutcome> {
        require_role(actor, DIPLOMA_CREATE_ROLES)?;
        let tenant_id = resolve_tenant(actor, input.tenant_id.as_deref())?;

        let mut created = Vec::new();
        let mut errors = Vec::new();

        for (index, row) in input.students.iter().enumerate() {
            if let Err(e) = row.validate() {
                errors.push(RowError {
                    index,
                    matricule: Some(row.student_matricule.clone()),
                    message: e.to_string(),
                });
                continue;
            }

            let mut metadata = DiplomaMetadata::default();
            metadata.audit_chain.push(AuditBreadcrumb {
                action: "BATCH_CREATE".to_string(),
                actor_id: Some(actor.id.clone()),
                timestamp: Utc::now(),
            });
            if let Some(campaign_id) = &input.campaign_id {
                metadata.extra.insert(
                    "promotionId".to_string(),
                    serde_json::Value::String(campaign_id.clone()),
                );
            }

            match self
                .insert_row(actor, row, &tenant_id, DiplomaStatus::Validated, metadata)
                .await
            {
                Ok(d) => created.push(d.id),
                Err(e) => errors.push(RowError {
                    index,
                    matricule: Some(row.student_matricule.clone()),
                    message: e.to_string(),
                }),
            }
        }

        self.audit
            .record(
                AuditEvent::by(actor, "DIPLOMA_BATCH_CREATE", "diploma")
                    .details(format!("created={} errors={}", created.len(), errors.len())),
            )
            .await;

        Ok(BatchOutcome { created, errors })
    }

    /// Import mapped spreadsheet rows as DRAFT records.
    ///
    /// Rows duplicating an existing (matricule, session) pair in the
    /// tenant are skipped with a row-indexed error.
    pub async fn import_mapped(
        &self,
        actor: &user::Model,
        campaign_id: Option<String>,
        rows: Vec<StudentRow>,
        tenant_id: Option<&str>,
    ) -> AppResult<ImportOutcome> {
        require_role(actor, DIPLOMA_CREATE_ROLES)?;
        let tenant_id = resolve_tenant(actor, tenant_id)?;

        let mut imported = 0;
        let mut skipped = 0;
        let mut errors = Vec::new();

        for (index, row) in rows.iter().enumerate() {
            if let Err(e) = row.validate() {
                errors.push(RowError {
                    index,
                    matricule: Some(row.student_matricule.clone()),
                    message: e.to_string(),
                });
                continue;
            }

            let duplicate = self
                .diploma_repo
                .find_duplicate(&tenant_id, &row.student_matricule, &row.session)
                .await?;
            if duplicate.is_some() {
                skipped += 1;
                errors.push(RowError {
                    index,
                    matricule: Some(row.student_matricule.clone()),
                    message: "Duplicate matricule for this session".to_string(),
                });
                continue;
            }

            let mut metadata = DiplomaMetadata::default();
            metadata.extra.insert(
                "source".to_string(),
                serde_json::Value::String("excel_import".to_string()),
            );
            if let Some(campaign_id) = &campaign_id {
                metadata.extra.insert(
                    "promotionId".to_string(),
                    serde_json::Value::String(campaign_id.clone()),
                );
            }

            match self
                .insert_row(actor, row, &tenant_id, DiplomaStatus::Draft, metadata)
                .await
            {
                Ok(_) => imported += 1,
                Err(e) => errors.push(RowError {
                    index,
                    matricule: Some(row.student_matricule.clone()),
                    message: e.to_string(),
                }),
            }
        }

        self.audit
            .record(
                AuditEvent::by(actor, "DIPLOMA_IMPORT", "diploma")
                    .details(format!("imported={imported} skipped={skipped}")),
            )
            .await;

        Ok(ImportOutcome {
            imported,
            skipped,
            errors,
        })
    }

    /// List diplomas in a tenant, newest first.
    pub async fn list(
        &self,
        actor: &user::Model,
        input: ListDiplomasInput,
    ) -> AppResult<Vec<diploma::Model>> {
        let tenant_id = resolve_tenant(actor, input.tenant_id.as_deref())?;
        let filter = DiplomaFilter {
            status: input.status,
            program: input.program,
            session: input.session,
        };
        let limit = input.limit.unwrap_or(50).min(500);

        self.diploma_repo
            .find_by_tenant(&tenant_id, &filter, limit, input.skip)
            .await
    }

    /// Get one diploma, tenant-guarded.
    pub async fn get(&self, actor: &user::Model, diploma_id: &str) -> AppResult<diploma::Model> {
        let diploma = self.diploma_repo.get_by_id(diploma_id).await?;
        require_tenant(actor, &diploma.tenant_id)?;
        Ok(diploma)
    }

    /// Records in the actor's tenant awaiting a signature the actor has
    /// not yet applied. Errors degrade to an empty list.
    pub async fn pending_for_signer(&self, actor: &user::Model) -> Vec<diploma::Model> {
        match self
            .diploma_repo
            .find_awaiting_signature(&actor.tenant_id)
            .await
        {
            Ok(list) => list
                .into_iter()
                .filter(|d| {
                    !DiplomaMetadata::parse(d.metadata_json.as_deref())
                        .has_signature_from(&actor.id)
                })
                .collect(),
            Err(e) => {
                warn!(error = %e, "Pending-signature listing failed, returning empty");
                Vec::new()
            }
        }
    }

    /// Apply the actor's signature.
    ///
    /// Business rejections (wrong state, wrong tenant) surface as
    /// errors. Persistence failures are logged and answered with a
    /// synthetic local-record success.
    pub async fn sign(
        &self,
        actor: &user::Model,
        diploma_id: &str,
        input: SignInput,
    ) -> AppResult<SignOutcome> {
        require_role(actor, DIPLOMA_SIGN_ROLES)?;

        match self.try_sign(actor, diploma_id, &input).await {
            Ok(outcome) => Ok(outcome),
            Err(AppError::Database(e) | AppError::Internal(e)) => {
                error!(diploma_id = %diploma_id, error = %e, "Signature write failed, recording locally");
                Ok(SignOutcome::recorded_locally(
                    diploma_id,
                    "Signature enregistrée localement (écriture différée)",
                ))
            }
            Err(other) => Err(other),
        }
    }

    async fn try_sign(
        &self,
        actor: &user::Model,
        diploma_id: &str,
        input: &SignInput,
    ) -> AppResult<SignOutcome> {
        let Some(diploma) = self.diploma_repo.find_by_id(diploma_id).await? else {
            warn!(diploma_id = %diploma_id, "Signing an unknown diploma, recording locally");
            return Ok(SignOutcome::recorded_locally(
                diploma_id,
                "Signature enregistrée localement",
            ));
        };

        require_tenant(actor, &diploma.tenant_id)?;

        let status: DiplomaStatus = diploma.status.parse()?;
        match status {
            DiplomaStatus::Cancelled => {
                return Err(AppError::BadRequest(
                    "Cannot sign a cancelled diploma".to_string(),
                ));
            }
            DiplomaStatus::Signed => {
                return Err(AppError::BadRequest(
                    "Diploma is already fully signed".to_string(),
                ));
            }
            _ => {}
        }

        let mut metadata = DiplomaMetadata::parse(diploma.metadata_json.as_deref());

        if metadata.has_signature_from(&actor.id) {
            return Ok(SignOutcome {
                diploma_id: diploma.id,
                status: SignStatus::AlreadySigned,
                message: "Signature déjà enregistrée pour ce signataire".to_string(),
                signature_count: Some(metadata.signatures.len()),
            });
        }

        metadata.signatures.push(signature_record(actor, input));
        metadata.audit_chain.push(AuditBreadcrumb {
            action: "DIPLOMA_SIGN".to_string(),
            actor_id: Some(actor.id.clone()),
            timestamp: Utc::now(),
        });

        let count = metadata.signatures.len();
        let new_status = if count >= SIGNATURE_QUORUM {
            DiplomaStatus::Signed
        } else {
            DiplomaStatus::PartiallySigned
        };

        let mut active: diploma::ActiveModel = diploma.into();
        active.status = Set(new_status.as_str().to_string());
        active.metadata_json = Set(Some(metadata.to_json()?));
        active.updated_at = Set(Some(Utc::now().into()));
        let updated = self.diploma_repo.update(active).await?;

        self.audit
            .record(
                AuditEvent::by(actor, "DIPLOMA_SIGN", "diploma")
                    .entity(&updated.id)
                    .details(format!("signatures={count} status={new_status}")),
            )
            .await;

        let (status, message) = if new_status == DiplomaStatus::Signed {
            (SignStatus::Signed, "Diplôme entièrement signé".to_string())
        } else {
            (
                SignStatus::PartiallySigned,
                format!("Signature enregistrée ({count}/{SIGNATURE_QUORUM})"),
            )
        };

        Ok(SignOutcome {
            diploma_id: updated.id,
            status,
            message,
            signature_count: Some(count),
        })
    }

    /// Anchor a fully signed record on the ledger. Single shot,
    /// tenant-guarded only.
    pub async fn anchor(&self, actor: &user::Model, diploma_id: &str) -> AppResult<diploma::Model> {
        let diploma = self.diploma_repo.get_by_id(diploma_id).await?;
        require_tenant(actor, &diploma.tenant_id)?;

        if diploma.status != DiplomaStatus::Signed.as_str() {
            return Err(AppError::BadRequest(
                "Only fully signed diplomas can be anchored".to_string(),
            ));
        }
        if diploma.blockchain_tx_id.is_some() {
            return Err(AppError::BadRequest(
                "Diploma is already anchored".to_string(),
            ));
        }

        let receipt = self
            .ledger
            .anchor(&diploma)
            .await
            .map_err(|e| AppError::Upstream(format!("Anchoring service failed: {e}")))?;

        let mut metadata = DiplomaMetadata::parse(diploma.metadata_json.as_deref());
        metadata.anchor = Some(receipt.clone());
        metadata.audit_chain.push(AuditBreadcrumb {
            action: "DIPLOMA_ANCHOR".to_string(),
            actor_id: Some(actor.id.clone()),
            timestamp: Utc::now(),
        });

        // One write: the receipt and the tx id land together or not at all.
        let mut active: diploma::ActiveModel = diploma.into();
        active.blockchain_tx_id = Set(Some(receipt.transaction_id.clone()));
        active.blockchain_anchored_at = Set(Some(receipt.anchored_at.into()));
        active.metadata_json = Set(Some(metadata.to_json()?));
        active.updated_at = Set(Some(Utc::now().into()));
        let updated = self.diploma_repo.update(active).await?;

        self.audit
            .record(
                AuditEvent::by(actor, "DIPLOMA_ANCHOR", "diploma")
                    .entity(&updated.id)
                    .details(receipt.transaction_id),
            )
            .await;

        Ok(updated)
    }

    /// Unauthenticated verification.
    ///
    /// A record absent from the registry is a negative answer, not an
    /// error. Any found record is reported authentic with its signing
    /// and anchoring state.
    pub async fn verify_public(&self, diploma_id: &str) -> AppResult<VerificationView> {
        let Some(diploma) = self.diploma_repo.find_by_id(diploma_id).await? else {
            return Ok(VerificationView {
                is_authentic: false,
                message: "Diplôme non trouvé dans le registre".to_string(),
                data: None,
            });
        };

        let metadata = DiplomaMetadata::parse(diploma.metadata_json.as_deref());
        let blockchain = diploma.blockchain_tx_id.clone().map(|tx| AnchorSummary {
            transaction_id: tx,
            anchored_at: diploma.blockchain_anchored_at,
        });

        Ok(VerificationView {
            is_authentic: true,
            message: "Diplôme vérifié avec succès".to_string(),
            data: Some(VerifiedDiploma {
                diploma_id: diploma.id,
                student_name: diploma.student_name,
                student_matricule: diploma.student_matricule,
                program: diploma.program,
                session: diploma.session,
                academic_level: diploma.academic_level,
                is_signed: diploma.status == DiplomaStatus::Signed.as_str(),
                is_anchored: blockchain.is_some(),
                status: diploma.status,
                signature_count: metadata.signatures.len(),
                blockchain,
            }),
        })
    }

    async fn insert_row(
        &self,
        actor: &user::Model,
        row: &StudentRow,
        tenant_id: &str,
        status: DiplomaStatus,
        metadata: DiplomaMetadata,
    ) -> AppResult<diploma::Model> {
        let model = diploma::ActiveModel {
            id: Set(new_diploma_id(&row.student_matricule, tenant_id)),
            student_matricule: Set(row.student_matricule.clone()),
            student_name: Set(row.student_name.clone()),
            program: Set(row.program.clone()),
            session: Set(row.session.clone()),
            academic_level: Set(row.academic_level.clone()),
            tenant_id: Set(tenant_id.to_string()),
            status: Set(status.as_str().to_string()),
            metadata_json: Set(Some(metadata.to_json()?)),
            blockchain_tx_id: Set(None),
            blockchain_anchored_at: Set(None),
            created_by: Set(Some(actor.id.clone())),
            issued_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };
        self.diploma_repo.create(model).await
    }
}

/// Build the signature entry for one signer, body fields overriding
/// the account's stored presentation.
fn signature_record(actor: &user::Model, input: &SignInput) -> SignatureRecord {
    SignatureRecord {
        signer_id: actor.id.clone(),
        signer_name: input
            .signer_name
            .clone()
            .unwrap_or_else(|| actor.full_name.clone()),
        signer_email: actor.email.clone(),
        role: actor.role.clone(),
        official_title: input
            .signer_title
            .clone()
            .or_else(|| actor.official_title.clone()),
        signature_img: input
            .signature_img
            .clone()
            .or_else(|| actor.signature_img.clone()),
        stamp_img: input.stamp_img.clone().or_else(|| actor.stamp_img.clone()),
        signed_at: Utc::now(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::anchor::SimulatedLedger;
    use sceau_db::repositories::{AuditLogRepository, UserRepository};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn test_actor(id: &str, role: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            email: format!("{id}@uni.test"),
            full_name: "Signer".to_string(),
            password_hash: String::new(),
            role: role.to_string(),
            tenant_id: "tenant-1".to_string(),
            status: "ACTIVE".to_string(),
            last_login: None,
            signature_img: None,
            stamp_img: None,
            official_title: Some("Recteur".to_string()),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn test_diploma(id: &str, status: &str, metadata_json: Option<String>) -> diploma::Model {
        diploma::Model {
            id: id.to_string(),
            student_matricule: "MAT-001".to_string(),
            student_name: "Awa Ndiaye".to_string(),
            program: "Licence Informatique".to_string(),
            session: "2025".to_string(),
            academic_level: None,
            tenant_id: "tenant-1".to_string(),
            status: status.to_string(),
            metadata_json,
            blockchain_tx_id: None,
            blockchain_anchored_at: None,
            created_by: None,
            issued_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn signed_metadata(signer_id: &str) -> String {
        let mut meta = DiplomaMetadata::default();
        meta.signatures.push(SignatureRecord {
            signer_id: signer_id.to_string(),
            signer_name: "Doyen Test".to_string(),
            signer_email: format!("{signer_id}@uni.test"),
            role: "DEAN".to_string(),
            official_title: None,
            signature_img: None,
            stamp_img: None,
            signed_at: Utc::now(),
        });
        meta.to_json().unwrap()
    }

    fn service(db: Arc<sea_orm::DatabaseConnection>) -> DiplomaService {
        DiplomaService::new(
            DiplomaRepository::new(db.clone()),
            AuditService::new(AuditLogRepository::new(db.clone()), UserRepository::new(db)),
            Arc::new(SimulatedLedger::default()),
        )
    }

    #[tokio::test]
    async fn test_sign_missing_diploma_records_locally() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<diploma::Model>::new()])
                .into_connection(),
        );

        let actor = test_actor("user-1", "RECTOR");
        let outcome = service(db).sign(&actor, "ghost", SignInput::default()).await.unwrap();

        assert_eq!(outcome.status, SignStatus::RecordedLocally);
        assert_eq!(outcome.message, "Signature enregistrée localement");
    }

    #[tokio::test]
    async fn test_sign_cancelled_rejected() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_diploma("d1", "CANCELLED", None)]])
                .into_connection(),
        );

        let actor = test_actor("user-1", "RECTOR");
        let result = service(db).sign(&actor, "d1", SignInput::default()).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_sign_fully_signed_rejected() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_diploma("d1", "SIGNED", None)]])
                .into_connection(),
        );

        let actor = test_actor("user-1", "RECTOR");
        let result = service(db).sign(&actor, "d1", SignInput::default()).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_sign_duplicate_signer_is_idempotent() {
        let diploma = test_diploma("d1", "PARTIALLY_SIGNED", Some(signed_metadata("user-1")));
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[diploma]])
                .into_connection(),
        );

        let actor = test_actor("user-1", "RECTOR");
        let outcome = service(db).sign(&actor, "d1", SignInput::default()).await.unwrap();

        assert_eq!(outcome.status, SignStatus::AlreadySigned);
        assert_eq!(outcome.signature_count, Some(1));
    }

    #[tokio::test]
    async fn test_second_signature_reaches_quorum() {
        let diploma = test_diploma("d1", "PARTIALLY_SIGNED", Some(signed_metadata("user-2")));
        let updated = test_diploma("d1", "SIGNED", None);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[diploma]])
                .append_query_results([[updated]])
                .into_connection(),
        );

        let actor = test_actor("user-1", "RECTOR");
        let outcome = service(db).sign(&actor, "d1", SignInput::default()).await.unwrap();

        assert_eq!(outcome.status, SignStatus::Signed);
        assert_eq!(outcome.signature_count, Some(2));
    }

    #[tokio::test]
    async fn test_first_signature_is_partial() {
        let diploma = test_diploma("d1", "VALIDATED", None);
        let updated = test_diploma("d1", "PARTIALLY_SIGNED", None);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[diploma]])
                .append_query_results([[updated]])
                .into_connection(),
        );

        let actor = test_actor("user-1", "RECTOR");
        let outcome = service(db).sign(&actor, "d1", SignInput::default()).await.unwrap();

        assert_eq!(outcome.status, SignStatus::PartiallySigned);
        assert_eq!(outcome.signature_count, Some(1));
    }

    #[tokio::test]
    async fn test_sign_write_failure_records_locally() {
        // Only the find is mocked; the update fails.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_diploma("d1", "VALIDATED", None)]])
                .into_connection(),
        );

        let actor = test_actor("user-1", "RECTOR");
        let outcome = service(db).sign(&actor, "d1", SignInput::default()).await.unwrap();

        assert_eq!(outcome.status, SignStatus::RecordedLocally);
        assert!(outcome.message.contains("différée"));
    }

    #[tokio::test]
    async fn test_sign_forbidden_for_viewer() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let actor = test_actor("user-1", "VIEWER");
        let result = service(db).sign(&actor, "d1", SignInput::default()).await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_anchor_requires_signed_status() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_diploma("d1", "VALIDATED", None)]])
                .into_connection(),
        );

        let actor = test_actor("user-1", "ADMIN");
        let result = service(db).anchor(&actor, "d1").await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_anchor_rejects_second_anchor() {
        let mut diploma = test_diploma("d1", "SIGNED", None);
        diploma.blockchain_tx_id = Some(format!("0x{}", "b".repeat(64)));

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[diploma]])
                .into_connection(),
        );

        let actor = test_actor("user-1", "ADMIN");
        let result = service(db).anchor(&actor, "d1").await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_verify_public_missing_is_not_authentic() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<diploma::Model>::new()])
                .into_connection(),
        );

        let view = service(db).verify_public("ghost").await.unwrap();
        assert!(!view.is_authentic);
        assert_eq!(view.message, "Diplôme non trouvé dans le registre");
        assert!(view.data.is_none());
    }

    #[tokio::test]
    async fn test_verify_public_signed_diploma() {
        let diploma = test_diploma("d1", "SIGNED", Some(signed_metadata("user-2")));
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[diploma]])
                .into_connection(),
        );

        let view = service(db).verify_public("d1").await.unwrap();
        assert!(view.is_authentic);

        let data = view.data.unwrap();
        assert!(data.is_signed);
        assert!(!data.is_anchored);
        assert!(data.blockchain.is_none());
        assert_eq!(data.signature_count, 1);
    }

    #[tokio::test]
    async fn test_verify_public_draft_is_authentic_but_unsigned() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_diploma("d1", "DRAFT", None)]])
                .into_connection(),
        );

        let view = service(db).verify_public("d1").await.unwrap();
        assert!(view.is_authentic);
        assert_eq!(view.message, "Diplôme vérifié avec succès");

        let data = view.data.unwrap();
        assert!(!data.is_signed);
        assert_eq!(data.status, "DRAFT");
    }

    #[tokio::test]
    async fn test_verify_public_anchored_carries_transaction() {
        let mut diploma = test_diploma("d1", "SIGNED", None);
        diploma.blockchain_tx_id = Some(format!("0x{}", "a".repeat(64)));
        diploma.blockchain_anchored_at = Some(Utc::now().into());

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[diploma]])
                .into_connection(),
        );

        let view = service(db).verify_public("d1").await.unwrap();
        let data = view.data.unwrap();
        assert!(data.is_anchored);

        let chain = data.blockchain.unwrap();
        assert!(chain.transaction_id.starts_with("0x"));
        assert!(chain.anchored_at.is_some());
    }

    #[tokio::test]
    async fn test_pending_excludes_own_signatures() {
        let signed_by_me = test_diploma("d1", "PARTIALLY_SIGNED", Some(signed_metadata("user-1")));
        let unsigned = test_diploma("d2", "VALIDATED", None);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[signed_by_me, unsigned]])
                .into_connection(),
        );

        let actor = test_actor("user-1", "RECTOR");
        let pending = service(db).pending_for_signer(&actor).await;

        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, "d2");
    }

    #[tokio::test]
    async fn test_pending_degrades_to_empty_on_error() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let actor = test_actor("user-1", "RECTOR");
        assert!(service(db).pending_for_signer(&actor).await.is_empty());
    }

    #[test]
    fn test_signature_record_falls_back_to_account() {
        let mut actor = test_actor("user-1", "RECTOR");
        actor.signature_img = Some("data:image/png;base64,sig".to_string());

        let record = signature_record(&actor, &SignInput::default());
        assert_eq!(record.signer_name, "Signer");
        assert_eq!(record.official_title.as_deref(), Some("Recteur"));
        assert_eq!(
            record.signature_img.as_deref(),
            Some("data:image/png;base64,sig")
        );
        assert!(record.stamp_img.is_none());
    }

    #[test]
    fn test_signature_record_body_overrides_account() {
        let actor = test_actor("user-1", "RECTOR");
        let input = SignInput {
            signer_name: Some("Pr. Diallo".to_string()),
            signer_title: Some("Doyen".to_string()),
            signature_img: Some("data:image/png;base64,override".to_string()),
            stamp_img: None,
        };

        let record = signature_record(&actor, &input);
        assert_eq!(record.signer_name, "Pr. Diallo");
        assert_eq!(record.official_title.as_deref(), Some("Doyen"));
        assert_eq!(
            record.signature_img.as_deref(),
            Some("data:image/png;base64,override")
        );
    }

    #[tokio::test]
    async fn test_anchor_open_to_tenant_members() {
        // No role gate on anchoring: a plain signer in the right tenant
        // gets the state check, not a Forbidden.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_diploma("d1", "VALIDATED", None)]])
                .into_connection(),
        );

        let actor = test_actor("user-1", "SIGNER");
        let result = service(db).anchor(&actor, "d1").await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_list_rejects_cross_tenant_for_admin() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let actor = test_actor("user-1", "ADMIN");
        let input = ListDiplomasInput {
            tenant_id: Some("tenant-2".to_string()),
            ..ListDiplomasInput::default()
        };
        let result = service(db).list(&actor, input).await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_create_targets_requested_tenant_for_super_admin() {
        let mut created = test_diploma("d1", "DRAFT", None);
        created.tenant_id = "tenant-2".to_string();

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[created]])
                .into_connection(),
        );

        let actor = test_actor("root", "SUPER_ADMIN");
        let row = StudentRow {
            student_matricule: "MAT-777".to_string(),
            student_name: "Moussa Ba".to_string(),
            program: "Master Droit".to_string(),
            session: "2026".to_string(),
            academic_level: Some("BAC+5".to_string()),
        };

        let diploma = service(db)
            .create(&actor, row, Some("tenant-2"))
            .await
            .unwrap();
        assert_eq!(diploma.tenant_id, "tenant-2");
    }
}
