use crate::dashboard::form::FormSession;
use crate::dashboard::notify::Notification;
use crate::dashboard::repository::VillaRepository;
use crate::models::Villa;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    List,
    Create,
    Edit,
}

/// Maps the current view to the form session it needs
#[derive(Debug)]
pub struct ViewRouter {
    view: View,
    form: Option<FormSession>,
}

impl ViewRouter {
    pub fn new() -> Self {
        Self {
            view: View::List,
            form: None,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn form(&self) -> Option<&FormSession> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut FormSession> {
        self.form.as_mut()
    }

    pub fn show_list(&mut self) {
        if let Some(form) = self.form.take() {
            form.discard();
        }
        self.view = View::List;
    }

    pub fn show_create(&mut self) {
        self.form = Some(FormSession::open(None));
        self.view = View::Create;
    }

    /// Open a fresh draft of `villa`, replacing whatever form was open
    pub fn show_edit(&mut self, villa: &Villa) {
        self.form = Some(FormSession::open(Some(villa)));
        self.view = View::Edit;
    }

    /// Submit the open form; back to the list on success, form kept on failure
    pub async fn submit(&mut self, repo: &VillaRepository) -> Option<Notification> {
        let form = self.form.take()?;
        match form.submit(repo).await {
            Ok(submitted) => {
                self.view = View::List;
                Some(submitted.notification)
            }
            Err(rejected) => {
                let notification = rejected.notification();
                self.form = Some(rejected.session);
                Some(notification)
            }
        }
    }
}

impl Default for ViewRouter {
    fn default() -> Self {
        Self::new()
    }
}
