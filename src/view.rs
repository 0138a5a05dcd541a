use serde::{Deserialize, Serialize};

use crate::mosaic::{CellId, Status};

/// The at-most-one active modal dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Overlay {
    /// Image/caption viewer for an approved cell
    ImageViewer(CellId),
    /// Purchase confirmation placeholder for an empty cell
    Purchase(CellId),
}

/// Transient UI state: hover target, active overlay, pending notice.
/// All transitions are pure; no Cell data is ever touched from here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    hover: Option<CellId>,
    overlay: Option<Overlay>,
    notice: Option<String>,
}

impl ViewState {
    pub fn hover(&self) -> Option<CellId> {
        self.hover
    }

    pub fn overlay(&self) -> Option<Overlay> {
        self.overlay
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Pointer entered a cell (or moved to a different one)
    pub fn hover_enter(&mut self, cell: CellId) {
        self.hover = Some(cell);
    }

    /// Pointer left the mosaic
    pub fn hover_clear(&mut self) {
        self.hover = None;
    }

    /// Click on a cell routes to exactly one dialog by status.
    /// Ignored while a dialog is already open; the overlay owns the
    /// pointer until dismissed.
    pub fn click(&mut self, cell: CellId, status: Status) {
        if self.overlay.is_some() {
            return;
        }
        self.notice = None;
        self.overlay = Some(match status {
            Status::Approved => Overlay::ImageViewer(cell),
            Status::Empty => Overlay::Purchase(cell),
        });
    }

    /// Backdrop click or explicit close: clear whichever dialog is open
    pub fn dismiss(&mut self) {
        self.overlay = None;
    }

    /// Confirm on the purchase dialog. A stub: announces the future
    /// redirect as a notice and closes the dialog. No-op for the viewer.
    pub fn confirm_purchase(&mut self) {
        if let Some(Overlay::Purchase(_)) = self.overlay {
            self.notice = Some("Demo checkout: payment redirect comes in step 2".to_owned());
            self.overlay = None;
        }
    }

    /// Drop the mosaic-scoped state after a regeneration pass; any open
    /// dialog would point at a cell that no longer exists.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(lon: f64, lat: f64) -> CellId {
        CellId::new(lon, lat)
    }

    #[test]
    fn empty_cell_opens_purchase_not_viewer() {
        let mut view = ViewState::default();
        view.click(id(12.0, 48.0), Status::Empty);
        assert_eq!(view.overlay(), Some(Overlay::Purchase(id(12.0, 48.0))));
    }

    #[test]
    fn approved_cell_opens_viewer_not_purchase() {
        let mut view = ViewState::default();
        view.click(id(12.0, 48.0), Status::Approved);
        assert_eq!(view.overlay(), Some(Overlay::ImageViewer(id(12.0, 48.0))));
    }

    #[test]
    fn backdrop_click_clears_dialog() {
        let mut view = ViewState::default();
        view.click(id(0.0, 0.0), Status::Empty);
        view.dismiss();
        assert_eq!(view.overlay(), None);
    }

    #[test]
    fn dialogs_are_mutually_exclusive() {
        let mut view = ViewState::default();
        view.click(id(0.0, 0.0), Status::Empty);
        // A second click while the dialog is open changes nothing
        view.click(id(3.0, 0.0), Status::Approved);
        assert_eq!(view.overlay(), Some(Overlay::Purchase(id(0.0, 0.0))));
    }

    #[test]
    fn confirm_notices_and_closes() {
        let mut view = ViewState::default();
        view.click(id(0.0, 0.0), Status::Empty);
        view.confirm_purchase();
        assert_eq!(view.overlay(), None);
        assert!(view.notice().is_some());
    }

    #[test]
    fn confirm_is_noop_for_viewer() {
        let mut view = ViewState::default();
        view.click(id(0.0, 0.0), Status::Approved);
        view.confirm_purchase();
        assert_eq!(view.overlay(), Some(Overlay::ImageViewer(id(0.0, 0.0))));
        assert!(view.notice().is_none());
    }

    #[test]
    fn hover_tracks_and_clears() {
        let mut view = ViewState::default();
        view.hover_enter(id(0.0, 0.0));
        assert_eq!(view.hover(), Some(id(0.0, 0.0)));
        view.hover_enter(id(3.0, 0.0));
        assert_eq!(view.hover(), Some(id(3.0, 0.0)));
        view.hover_clear();
        assert_eq!(view.hover(), None);
    }

    #[test]
    fn next_click_clears_stale_notice() {
        let mut view = ViewState::default();
        view.click(id(0.0, 0.0), Status::Empty);
        view.confirm_purchase();
        view.click(id(3.0, 0.0), Status::Empty);
        assert!(view.notice().is_none());
    }
}
