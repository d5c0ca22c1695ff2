//! View state for a signed-in user and the action dispatch that drives it.
//!
//! A [`Session`] is created at sign-in and dropped at logout. Every user
//! interaction arrives as an [`Action`]; the returned [`Effect`] tells the
//! caller what I/O to perform. Network results come back through
//! [`Session::apply_page`]. The session itself never performs I/O.

use std::collections::HashMap;

use tracing::debug;

use crate::catalog::{Book, BookForm, BookPage, CatalogQuery, SortDir, SortField};
use crate::client::{AuthResponse, User};
use crate::paginator::{PageWindow, Paginator};

pub const ADMIN_REQUIRED: &str = "Only administrators can modify the catalog";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchRequest {
    pub ticket: u64,
    pub page: usize,
    pub query: CatalogQuery,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MutationTarget {
    Create,
    Update(u64),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditorState {
    pub target: MutationTarget,
    pub form: BookForm,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    PageChangeRequested(i64),
    NextPage,
    PreviousPage,
    FirstPage,
    LastPage,
    PageSizeChanged(u32),
    SortFieldChanged(SortField),
    SortDirectionChanged(SortDir),
    Refresh,
    CreateRequested,
    EditRequested(u64),
    EditCancelled,
    DeleteRequested(u64),
    MutationSucceeded,
    LoggedOut,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    None,
    Reload(FetchRequest),
    OpenEditor(EditorState),
    ConfirmDelete(u64),
    CloseEditor,
    SignedOut,
    Denied(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    Rendered,
    Stale,
    /// The result set shrank below the current page; fetch the clamped page.
    Reload(FetchRequest),
}

#[derive(Clone, Debug)]
pub struct Session {
    user: User,
    query: CatalogQuery,
    paginator: Paginator,
    order: Vec<u64>,
    records: HashMap<u64, Book>,
    editing: Option<MutationTarget>,
    last_ticket: u64,
}

impl Session {
    pub fn new(user: User, query: CatalogQuery) -> Self {
        Self {
            user,
            query,
            paginator: Paginator::new(),
            order: Vec::new(),
            records: HashMap::new(),
            editing: None,
            last_ticket: 0,
        }
    }

    pub fn from_auth(auth: AuthResponse, query: CatalogQuery) -> Self {
        Self::new(auth.user, query)
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn is_admin(&self) -> bool {
        self.user.role.is_admin()
    }

    pub fn query(&self) -> CatalogQuery {
        self.query
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    pub fn window(&self) -> PageWindow {
        self.paginator.compute_window()
    }

    /// Records of the displayed page, in server order.
    pub fn books(&self) -> impl Iterator<Item = &Book> + '_ {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    pub fn book(&self, id: u64) -> Option<&Book> {
        self.records.get(&id)
    }

    pub fn editing(&self) -> Option<MutationTarget> {
        self.editing
    }

    /// Fetch for the page currently displayed.
    pub fn reload(&mut self) -> FetchRequest {
        self.last_ticket += 1;
        FetchRequest {
            ticket: self.last_ticket,
            page: self.paginator.current_page(),
            query: self.query,
        }
    }

    pub fn dispatch(&mut self, action: Action) -> Effect {
        debug!(?action, "dispatch");
        match action {
            Action::PageChangeRequested(target) => self.navigate(target),
            Action::NextPage => self.navigate(self.paginator.next_target()),
            Action::PreviousPage => self.navigate(self.paginator.previous_target()),
            Action::FirstPage => self.navigate(0),
            Action::LastPage => self.navigate(self.paginator.last_target()),
            Action::PageSizeChanged(size) => {
                self.query.size = size;
                self.restart()
            }
            Action::SortFieldChanged(field) => {
                self.query.sort_by = field;
                self.restart()
            }
            Action::SortDirectionChanged(dir) => {
                self.query.sort_dir = dir;
                self.restart()
            }
            Action::Refresh => Effect::Reload(self.reload()),
            Action::CreateRequested => {
                if !self.is_admin() {
                    return Effect::Denied(ADMIN_REQUIRED.to_string());
                }
                self.editing = Some(MutationTarget::Create);
                Effect::OpenEditor(EditorState {
                    target: MutationTarget::Create,
                    form: BookForm::default(),
                })
            }
            Action::EditRequested(id) => {
                if !self.is_admin() {
                    return Effect::Denied(ADMIN_REQUIRED.to_string());
                }
                let Some(book) = self.records.get(&id) else {
                    return Effect::Denied(format!("Book {id} is not on the current page"));
                };
                let form = BookForm::from_book(book);
                self.editing = Some(MutationTarget::Update(id));
                Effect::OpenEditor(EditorState {
                    target: MutationTarget::Update(id),
                    form,
                })
            }
            Action::EditCancelled => {
                self.editing = None;
                Effect::CloseEditor
            }
            Action::DeleteRequested(id) => {
                if !self.is_admin() {
                    return Effect::Denied(ADMIN_REQUIRED.to_string());
                }
                Effect::ConfirmDelete(id)
            }
            Action::MutationSucceeded => {
                self.editing = None;
                Effect::Reload(self.reload())
            }
            Action::LoggedOut => {
                self.clear();
                Effect::SignedOut
            }
        }
    }

    /// Accept the response to `ticket`. Responses to superseded fetches are dropped.
    pub fn apply_page(&mut self, ticket: u64, page: BookPage) -> Applied {
        if ticket != self.last_ticket {
            debug!(ticket, latest = self.last_ticket, "ignoring stale page");
            return Applied::Stale;
        }

        self.order = page.content.iter().map(|b| b.id).collect();
        self.records = page.content.into_iter().map(|b| (b.id, b)).collect();

        let clamped = self
            .paginator
            .set_total(page.total_pages, page.total_elements);
        if clamped && page.total_pages > 0 {
            debug!(page = self.paginator.current_page(), "current page clamped");
            return Applied::Reload(self.reload());
        }
        Applied::Rendered
    }

    fn navigate(&mut self, target: i64) -> Effect {
        let mut changed = false;
        let mut on_page_changed = |_page: usize| changed = true;
        if let Err(reason) = self.paginator.navigate(target, &mut on_page_changed) {
            debug!(%reason, "page change ignored");
        }
        if changed {
            Effect::Reload(self.reload())
        } else {
            Effect::None
        }
    }

    fn restart(&mut self) -> Effect {
        self.paginator.reset_to_first_page();
        Effect::Reload(self.reload())
    }

    fn clear(&mut self) {
        self.paginator = Paginator::new();
        self.order.clear();
        self.records.clear();
        self.editing = None;
    }
}
