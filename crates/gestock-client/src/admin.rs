//! # Administration
//!
//! Tenant management for the platform super admin and user management for
//! tenant admins. Both sit on [`ApiClient`], so they share its headers and
//! error mapping.
//!
//! ```text
//! TenantAdmin ── /super-admin/clients ........ list (with activity counters)
//!             ── /super-admin/clients/{id}/status  PATCH {actif}
//!             ── /super-admin/clients/{id}/extend  PATCH {mois}
//!             ── /super-admin/clients/{id}/stats   GET
//!             ── /super-admin/clients/{id}         DELETE
//!             ── /super-admin/dashboard            GET
//!             ── /clients                          create / update
//!
//! UserAdmin   ── /users                            list / create / update / delete
//! ```

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use gestock_core::validation::validate_positive;
use gestock_core::{AdminDashboard, Client, ClientStats, NewClient, NewUser, User, UserUpdate};

use crate::api::ApiClient;
use crate::error::ClientResult;

#[derive(Serialize)]
struct StatusChange {
    actif: bool,
}

#[derive(Serialize)]
struct Extension {
    mois: i64,
}

// =============================================================================
// Tenant Administration
// =============================================================================

#[derive(Debug, Clone)]
pub struct TenantAdmin {
    api: ApiClient,
}

impl TenantAdmin {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list_clients(&self) -> ClientResult<Vec<Client>> {
        self.api.get("/super-admin/clients").await
    }

    pub async fn create_client(&self, client: &NewClient) -> ClientResult<Client> {
        let created = self.api.create_client(client).await?;
        info!(client_id = created.id, nom = %created.nom_entreprise, "Tenant created");
        Ok(created)
    }

    pub async fn update_client(&self, id: i64, client: &NewClient) -> ClientResult<Client> {
        let updated = self.api.update_client(id, client).await?;
        info!(client_id = id, "Tenant updated");
        Ok(updated)
    }

    /// Activates or suspends a tenant.
    pub async fn set_active(&self, id: i64, actif: bool) -> ClientResult<()> {
        let _: Value = self
            .api
            .patch(
                &format!("/super-admin/clients/{}/status", id),
                &StatusChange { actif },
            )
            .await?;
        info!(client_id = id, actif, "Tenant status changed");
        Ok(())
    }

    /// Flips the active flag of `client`.
    pub async fn toggle_active(&self, client: &Client) -> ClientResult<bool> {
        let actif = !client.actif;
        self.set_active(client.id, actif).await?;
        Ok(actif)
    }

    /// Extends the subscription by `months` (must be positive).
    pub async fn extend_subscription(&self, id: i64, months: i64) -> ClientResult<()> {
        validate_positive("mois", months)?;
        let _: Value = self
            .api
            .patch(
                &format!("/super-admin/clients/{}/extend", id),
                &Extension { mois: months },
            )
            .await?;
        info!(client_id = id, months, "Subscription extended");
        Ok(())
    }

    pub async fn client_stats(&self, id: i64) -> ClientResult<ClientStats> {
        self.api.get(&format!("/super-admin/clients/{}/stats", id)).await
    }

    pub async fn delete_client(&self, id: i64) -> ClientResult<()> {
        self.api.delete(&format!("/super-admin/clients/{}", id)).await?;
        info!(client_id = id, "Tenant deleted");
        Ok(())
    }

    pub async fn dashboard(&self) -> ClientResult<AdminDashboard> {
        self.api.get("/super-admin/dashboard").await
    }
}

// =============================================================================
// User Administration
// =============================================================================

#[derive(Debug, Clone)]
pub struct UserAdmin {
    api: ApiClient,
}

impl UserAdmin {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list_users(&self) -> ClientResult<Vec<User>> {
        self.api.list_users().await
    }

    /// Tenants a new user can be attached to.
    pub async fn list_clients(&self) -> ClientResult<Vec<Client>> {
        self.api.list_clients().await
    }

    pub async fn create_user(&self, user: &NewUser) -> ClientResult<User> {
        let created = self.api.create_user(user).await?;
        info!(user_id = created.id, role = %created.role, "User created");
        Ok(created)
    }

    /// Updates a user. The password is never part of an update.
    pub async fn update_user(&self, id: i64, user: &UserUpdate) -> ClientResult<User> {
        let updated = self.api.update_user(id, user).await?;
        info!(user_id = id, role = %updated.role, "User updated");
        Ok(updated)
    }

    pub async fn delete_user(&self, id: i64) -> ClientResult<()> {
        self.api.delete_user(id).await?;
        info!(user_id = id, "User deleted");
        Ok(())
    }
}
