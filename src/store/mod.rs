//! Board Store
//!
//! The single owned state object of a session: optimistic cache, record
//! store handle, notifier and configuration. Views hold a reference (or an
//! `Rc`) to it and call its actions from event handlers.
//!
//! Everything runs on the UI thread. Actions borrow the cache only between
//! awaits, so a cache borrow held by the caller must be released before
//! awaiting an action.

use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

use board_store::{Board, Card, Filter, List, Member, Subtask};

use crate::analytics::Analytics;
use crate::backend::Backend;
use crate::cache::BoardCache;
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::ordering::ItemId;
use crate::session::{Session, ViewMode};
use crate::toast::{Notifier, Severity};

mod admin;
mod boards;
mod cards;
mod lists;
mod reorder;
mod subtasks;


pub use cards::CardEdit;
pub use reorder::{CommitReport, PendingReorder, Reorderable};

/// Which boards `load_boards` fetches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardScope {
    /// Every board of the session's company
    Company,
    /// Only boards the session user is a member of
    Mine,
}

pub struct BoardStore {
    cache: RefCell<BoardCache>,
    backend: Backend,
    notifier: Rc<dyn Notifier>,
    config: StoreConfig,
    session: RefCell<Option<Session>>,
    view_mode: Cell<ViewMode>,
    analytics: RefCell<Option<Analytics>>,
}

impl BoardStore {
    pub fn new(backend: Backend, notifier: Rc<dyn Notifier>, config: StoreConfig) -> Self {
        Self {
            cache: RefCell::new(BoardCache::new()),
            backend,
            notifier,
            config,
            session: RefCell::new(None),
            view_mode: Cell::new(ViewMode::default()),
            analytics: RefCell::new(None),
        }
    }

    /// Read access for rendering
    pub fn cache(&self) -> Ref<'_, BoardCache> {
        self.cache.borrow()
    }

    pub fn revision(&self) -> u64 {
        self.cache.borrow().revision()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn session(&self) -> Option<Session> {
        self.session.borrow().clone()
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode.get()
    }

    /// Log a failed action, tell the user, hand the error back
    fn report(&self, message: &str, err: impl Into<StoreError>) -> StoreError {
        let err = err.into();
        log::error!("{}: {}", message, err);
        self.notifier.notify(message, Severity::Error);
        err
    }

    fn announce(&self, message: &str) {
        log::info!("{}", message);
        self.notifier.notify(message, Severity::Success);
    }

    fn require_session(&self, action: &str) -> StoreResult<Session> {
        self.session()
            .ok_or_else(|| self.report(&format!("Sign in to {}", action), StoreError::NoSession))
    }

    fn require_title(&self, title: &str, what: &str) -> StoreResult<String> {
        let title = title.trim();
        if title.is_empty() {
            let message = format!("{} title is required", what);
            return Err(self.report(&message, StoreError::InvalidInput(message.clone())));
        }
        Ok(title.to_string())
    }

    // ========================
    // Session
    // ========================

    /// Start a session and refresh the user's member cache row
    pub async fn sign_in(&self, session: Session) -> StoreResult<()> {
        if !session.has_access() {
            return Err(self.report(
                "You do not have access to this board",
                StoreError::NotPermitted(session.user_id.clone()),
            ));
        }

        let member = session.member_record();
        *self.session.borrow_mut() = Some(session);
        self.view_mode.set(ViewMode::Member);

        match self.backend.members.create(&member).await {
            Ok(saved) => self.cache.borrow_mut().upsert(saved),
            // Presence tracking only; the session stays usable
            Err(e) => log::warn!("Failed to record member {}: {}", member.id, e),
        }
        Ok(())
    }

    /// Drop the session and everything cached for it
    pub fn sign_out(&self) {
        *self.session.borrow_mut() = None;
        *self.analytics.borrow_mut() = None;
        self.view_mode.set(ViewMode::default());
        *self.cache.borrow_mut() = BoardCache::new();
    }

    pub fn set_view_mode(&self, mode: ViewMode) -> StoreResult<()> {
        let session = self.require_session("switch views")?;
        if !session.allows(mode) {
            return Err(self.report(
                "Admin view requires admin access",
                StoreError::NotPermitted(format!("{:?} view", mode)),
            ));
        }
        self.view_mode.set(mode);
        Ok(())
    }

    // ========================
    // Loading
    // ========================

    pub async fn load_boards(&self, scope: BoardScope) -> StoreResult<Vec<Board>> {
        let session = self.require_session("load boards")?;
        let filter = Filter::all()
            .eq("company_id", session.company_id.clone())
            .order_by("created_at");

        let mut boards = self
            .backend
            .boards
            .list(&filter)
            .await
            .map_err(|e| self.report("Failed to load boards", e))?;
        if scope == BoardScope::Mine {
            boards.retain(|b| b.is_member(&session.user_id));
        }

        self.cache.borrow_mut().replace_where(|_: &Board| true, boards.clone());
        Ok(boards)
    }

    pub async fn load_members(&self) -> StoreResult<Vec<Member>> {
        let session = self.require_session("load members")?;
        let members = self
            .backend
            .members
            .list(&Filter::all().eq("company_id", session.company_id.clone()))
            .await
            .map_err(|e| self.report("Failed to load users", e))?;

        self.cache.borrow_mut().replace_where(|_: &Member| true, members.clone());
        Ok(members)
    }

    pub async fn load_lists(&self, board_id: ItemId) -> StoreResult<Vec<List>> {
        let lists = self
            .backend
            .lists
            .list(&Filter::all().eq("board_id", board_id).order_by("order"))
            .await
            .map_err(|e| self.report("Failed to load lists", e))?;

        self.cache
            .borrow_mut()
            .replace_where(|l: &List| l.board_id == board_id, lists.clone());
        Ok(lists)
    }

    /// Cards of every list on the board
    pub async fn load_cards(&self, board_id: ItemId) -> StoreResult<Vec<Card>> {
        let list_ids: Vec<ItemId> = self
            .backend
            .lists
            .list(&Filter::all().eq("board_id", board_id))
            .await
            .map_err(|e| self.report("Failed to load cards", e))?
            .iter()
            .map(|l| l.id)
            .collect();

        let cards = self
            .backend
            .cards
            .list(&Filter::all().is_in("list_id", list_ids.clone()).order_by("order"))
            .await
            .map_err(|e| self.report("Failed to load cards", e))?;

        self.cache
            .borrow_mut()
            .replace_where(|c: &Card| list_ids.contains(&c.list_id), cards.clone());
        Ok(cards)
    }

    pub async fn load_subtasks(&self, card_id: ItemId) -> StoreResult<Vec<Subtask>> {
        let subtasks = self
            .backend
            .subtasks
            .list(&Filter::all().eq("card_id", card_id).order_by("order"))
            .await
            .map_err(|e| self.report("Failed to load subtasks", e))?;

        self.cache
            .borrow_mut()
            .replace_where(|s: &Subtask| s.card_id == card_id, subtasks.clone());
        Ok(subtasks)
    }

    /// Lists and cards of one board
    pub async fn load_board(&self, board_id: ItemId) -> StoreResult<()> {
        self.load_lists(board_id).await?;
        self.load_cards(board_id).await?;
        Ok(())
    }
}
