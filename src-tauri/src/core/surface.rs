//! Surface ownership
//!
//! The chat web view is a single engine instance (one cookie jar, one page
//! state). It can live in the popover, the chat bar or the main window, but
//! only ever in one of them. `SurfaceCoordinator` tracks which container owns
//! it and drives a `SurfaceHost` through detach/attach in the right order.

use serde::{Deserialize, Serialize};

/// A container able to host the shared chat web view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceKind {
    Popover,
    ChatBar,
    MainWindow,
}

impl SurfaceKind {
    pub const ALL: [SurfaceKind; 3] = [Self::Popover, Self::ChatBar, Self::MainWindow];

    /// Tauri window label of the container
    pub fn label(self) -> &'static str {
        match self {
            Self::Popover => "popover",
            Self::ChatBar => "chat-bar",
            Self::MainWindow => "main",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.label() == label)
    }
}

/// Platform side of surface switching
///
/// `attach` must leave the web view visible inside the container and
/// `detach` must take the container off screen. Neither may destroy the
/// web view.
pub trait SurfaceHost {
    type Error;

    fn attach(&mut self, to: SurfaceKind) -> Result<(), Self::Error>;
    fn detach(&mut self, from: SurfaceKind) -> Result<(), Self::Error>;
}

/// Result of a coordinator operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Unchanged,
    Attached {
        from: Option<SurfaceKind>,
        to: SurfaceKind,
    },
    Detached(SurfaceKind),
}

impl Transition {
    /// True when this transition hid `kind` without moving the view elsewhere
    pub fn is_detach_of(self, kind: SurfaceKind) -> bool {
        matches!(self, Transition::Detached(from) if from == kind)
    }
}

#[derive(Debug, Default)]
pub struct SurfaceCoordinator {
    owner: Option<SurfaceKind>,
}

impl SurfaceCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owner(&self) -> Option<SurfaceKind> {
        self.owner
    }

    pub fn is_owner(&self, kind: SurfaceKind) -> bool {
        self.owner == Some(kind)
    }

    /// Move the web view into `to`, detaching it from the current owner first.
    pub fn attach<H: SurfaceHost>(
        &mut self,
        host: &mut H,
        to: SurfaceKind,
    ) -> Result<Transition, H::Error> {
        if self.owner == Some(to) {
            return Ok(Transition::Unchanged);
        }

        let from = self.owner;
        if let Some(previous) = from {
            host.detach(previous)?;
            self.owner = None;
        }

        host.attach(to)?;
        self.owner = Some(to);
        tracing::debug!(?from, ?to, "surface attached");
        Ok(Transition::Attached { from, to })
    }

    /// Detach from `from` if, and only if, it currently owns the web view.
    pub fn detach<H: SurfaceHost>(
        &mut self,
        host: &mut H,
        from: SurfaceKind,
    ) -> Result<Transition, H::Error> {
        if self.owner != Some(from) {
            return Ok(Transition::Unchanged);
        }

        host.detach(from)?;
        self.owner = None;
        tracing::debug!(?from, "surface detached");
        Ok(Transition::Detached(from))
    }

    /// Detach whichever container owns the web view.
    pub fn release<H: SurfaceHost>(&mut self, host: &mut H) -> Result<Transition, H::Error> {
        match self.owner {
            Some(owner) => self.detach(host, owner),
            None => Ok(Transition::Unchanged),
        }
    }

    pub fn toggle<H: SurfaceHost>(
        &mut self,
        host: &mut H,
        kind: SurfaceKind,
    ) -> Result<Transition, H::Error> {
        if self.is_owner(kind) {
            self.detach(host, kind)
        } else {
            self.attach(host, kind)
        }
    }
}
