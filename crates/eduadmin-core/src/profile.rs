//! Profile page: account details and password change.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use crate::actions::FormKind;
use crate::api::ApiTransport;
use crate::config::ClientConfig;
use crate::feedback::FeedbackSurface;
use crate::form::FormPayload;
use crate::page::Page;
use crate::submission::{FormController, SubmitReport, SubmitTrigger};

/// Fields left as `None` are not sent, so the server keeps their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub class_level: Option<String>,
    pub filiere: Option<String>,
    pub profile_picture: Option<PathBuf>,
}

impl ProfileUpdate {
    fn into_payload(self) -> Result<FormPayload> {
        let mut payload = FormPayload::new();
        for (name, value) in [
            ("first_name", self.first_name),
            ("last_name", self.last_name),
            ("phone", self.phone),
            ("class_level", self.class_level),
            ("filiere", self.filiere),
        ] {
            if let Some(value) = value {
                payload.push_text(name, value);
            }
        }
        if let Some(picture) = &self.profile_picture {
            payload.attach_path("profile_picture", picture)?;
        }
        Ok(payload)
    }
}

pub struct ProfileView {
    profile_form: FormController,
    password_form: FormController,
}

impl ProfileView {
    pub fn new(
        config: &ClientConfig,
        transport: Arc<dyn ApiTransport>,
        page: Arc<dyn Page>,
        feedback: FeedbackSurface,
    ) -> Self {
        let form = |kind: FormKind, label: &str| {
            FormController::new(
                kind,
                transport.clone(),
                page.clone(),
                feedback.clone(),
                config.form_reload_delay(),
            )
            .with_trigger(SubmitTrigger::new(label))
        };

        Self {
            profile_form: form(FormKind::UpdateProfile, "Enregistrer"),
            password_form: form(FormKind::ChangePassword, "Changer le mot de passe"),
        }
    }

    pub fn profile_form(&self) -> &FormController {
        &self.profile_form
    }

    pub fn password_form(&self) -> &FormController {
        &self.password_form
    }

    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<SubmitReport> {
        let payload = update.into_payload()?;
        self.profile_form.edit(|f| *f = payload);
        Ok(self.profile_form.submit().await)
    }

    pub async fn change_password(&self, old_password: &str, new_password: &str) -> SubmitReport {
        self.password_form.edit(|f| {
            f.set_text("old_password", old_password);
            f.set_text("new_password", new_password);
        });
        self.password_form.submit().await
    }
}
