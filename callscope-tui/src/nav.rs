//! Pane focus and viewer tab switching.

/// Which part of the screen receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Form,
    Calls,
    Call,
}

impl Pane {
    pub fn title(&self) -> &'static str {
        match self {
            Pane::Form => "New Call",
            Pane::Calls => "Calls",
            Pane::Call => "Call",
        }
    }

    pub fn all() -> &'static [Pane] {
        &[Pane::Form, Pane::Calls, Pane::Call]
    }

    pub fn next(&self) -> Pane {
        cycle(Self::all(), self, 1)
    }

    pub fn previous(&self) -> Pane {
        cycle(Self::all(), self, Self::all().len() - 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerTab {
    Overview,
    Transcript,
    Performance,
    Media,
    Raw,
}

impl ViewerTab {
    pub fn title(&self) -> &'static str {
        match self {
            ViewerTab::Overview => "Overview",
            ViewerTab::Transcript => "Transcript",
            ViewerTab::Performance => "Performance",
            ViewerTab::Media => "Media",
            ViewerTab::Raw => "Raw",
        }
    }

    pub fn all() -> &'static [ViewerTab] {
        &[
            ViewerTab::Overview,
            ViewerTab::Transcript,
            ViewerTab::Performance,
            ViewerTab::Media,
            ViewerTab::Raw,
        ]
    }

    pub fn index(&self) -> usize {
        Self::all().iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<ViewerTab> {
        Self::all().get(index).copied()
    }

    pub fn next(&self) -> ViewerTab {
        cycle(Self::all(), self, 1)
    }

    pub fn previous(&self) -> ViewerTab {
        cycle(Self::all(), self, Self::all().len() - 1)
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: &T, step: usize) -> T {
    let idx = all.iter().position(|v| v == current).unwrap_or(0);
    all[(idx + step) % all.len()]
}
