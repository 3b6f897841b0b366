//! Catalogue of everything an administrator or profile owner can trigger.

use crate::page::Dialog;

pub const CONNECTION_ERROR: &str = "Erreur de connexion";
pub const SERVER_CONNECTION_ERROR: &str = "Erreur de connexion au serveur";

/// Confirm-then-POST actions bound to table buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceAction {
    ToggleUserActive,
    VerifyUser,
    DeleteContent,
    ToggleContentAccess,
    ApproveGroup,
    RejectGroup,
    DeletePublication,
    ApproveProUpgrade,
    RejectProUpgrade,
}

impl ResourceAction {
    pub const ALL: [ResourceAction; 9] = [
        ResourceAction::ToggleUserActive,
        ResourceAction::VerifyUser,
        ResourceAction::DeleteContent,
        ResourceAction::ToggleContentAccess,
        ResourceAction::ApproveGroup,
        ResourceAction::RejectGroup,
        ResourceAction::DeletePublication,
        ResourceAction::ApproveProUpgrade,
        ResourceAction::RejectProUpgrade,
    ];

    pub fn verb(&self) -> &'static str {
        match self {
            ResourceAction::ToggleUserActive | ResourceAction::ToggleContentAccess => "toggle",
            ResourceAction::VerifyUser => "verify",
            ResourceAction::DeleteContent | ResourceAction::DeletePublication => "delete",
            ResourceAction::ApproveGroup | ResourceAction::ApproveProUpgrade => "approve",
            ResourceAction::RejectGroup | ResourceAction::RejectProUpgrade => "reject",
        }
    }

    pub fn resource(&self) -> &'static str {
        match self {
            ResourceAction::ToggleUserActive => "user_active",
            ResourceAction::VerifyUser => "user",
            ResourceAction::DeleteContent => "content",
            ResourceAction::ToggleContentAccess => "content_access",
            ResourceAction::ApproveGroup | ResourceAction::RejectGroup => "group",
            ResourceAction::DeletePublication => "publication",
            ResourceAction::ApproveProUpgrade | ResourceAction::RejectProUpgrade => "pro_upgrade",
        }
    }

    /// `/admin/<verb>_<resource>/<id>`
    pub fn path(&self, id: u64) -> String {
        format!("/admin/{}_{}/{}", self.verb(), self.resource(), id)
    }

    pub fn confirmation(&self) -> &'static str {
        match self {
            ResourceAction::ToggleUserActive => "Changer le statut de cet utilisateur?",
            ResourceAction::VerifyUser => "Vérifier cet utilisateur?",
            ResourceAction::DeleteContent => "Supprimer ce contenu? Cette action est irréversible.",
            ResourceAction::ToggleContentAccess => "Changer le type d'accès de ce contenu?",
            ResourceAction::ApproveGroup => "Approuver cette demande de groupe?",
            ResourceAction::RejectGroup => "Rejeter cette demande de groupe?",
            ResourceAction::DeletePublication => "Supprimer cette publication?",
            ResourceAction::ApproveProUpgrade => "Approuver cette demande d'upgrade PRO?",
            ResourceAction::RejectProUpgrade => "Rejeter cette demande d'upgrade PRO?",
        }
    }

    /// Shown when the server refuses without a usable detail
    pub fn failure_message(&self) -> &'static str {
        match self {
            ResourceAction::ToggleUserActive | ResourceAction::ToggleContentAccess => {
                "Erreur lors de la modification"
            }
            ResourceAction::VerifyUser => "Erreur lors de la vérification",
            ResourceAction::DeleteContent | ResourceAction::DeletePublication => {
                "Erreur lors de la suppression"
            }
            ResourceAction::ApproveGroup | ResourceAction::ApproveProUpgrade => {
                "Erreur lors de l'approbation"
            }
            ResourceAction::RejectGroup | ResourceAction::RejectProUpgrade => {
                "Erreur lors du rejet"
            }
        }
    }
}

/// What a form does to the view once the server accepts it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterSuccess {
    CloseDialogAndReset(Dialog),
    CloseDialogAndReload(Dialog),
    Reload,
    ResetInPlace,
}

/// Forms whose submit is intercepted and sent as multipart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    IssueWarning,
    UploadContent,
    CreatePublication,
    UpdateProfile,
    ChangePassword,
}

impl FormKind {
    pub fn endpoint(&self) -> &'static str {
        match self {
            FormKind::IssueWarning => "/admin/issue_warning",
            FormKind::UploadContent => "/admin/upload_content",
            FormKind::CreatePublication => "/admin/create_publication",
            FormKind::UpdateProfile => "/update_profile",
            FormKind::ChangePassword => "/change_password",
        }
    }

    pub fn after_success(&self) -> AfterSuccess {
        match self {
            FormKind::IssueWarning => AfterSuccess::CloseDialogAndReset(Dialog::Warning),
            FormKind::UploadContent => AfterSuccess::CloseDialogAndReload(Dialog::UploadContent),
            FormKind::CreatePublication => {
                AfterSuccess::CloseDialogAndReload(Dialog::CreatePublication)
            }
            FormKind::UpdateProfile => AfterSuccess::Reload,
            FormKind::ChangePassword => AfterSuccess::ResetInPlace,
        }
    }

    /// Trigger label while the request is in flight
    pub fn loading_label(&self) -> &'static str {
        match self {
            FormKind::IssueWarning => "Envoi...",
            FormKind::UploadContent => "Upload...",
            FormKind::CreatePublication => "Publication...",
            FormKind::UpdateProfile | FormKind::ChangePassword => "Chargement...",
        }
    }

    pub fn failure_message(&self) -> &'static str {
        match self {
            FormKind::IssueWarning | FormKind::CreatePublication => "Erreur",
            FormKind::UploadContent => "Erreur lors de l'upload",
            FormKind::UpdateProfile => "Erreur lors de la mise à jour",
            FormKind::ChangePassword => "Erreur lors du changement",
        }
    }

    /// Admin forms and profile forms word the transport failure differently
    pub fn connection_error(&self) -> &'static str {
        match self {
            FormKind::UpdateProfile | FormKind::ChangePassword => SERVER_CONNECTION_ERROR,
            _ => CONNECTION_ERROR,
        }
    }

    pub fn reloads(&self) -> bool {
        matches!(
            self.after_success(),
            AfterSuccess::Reload | AfterSuccess::CloseDialogAndReload(_)
        )
    }
}
