//! The active document: nothing, a single image, or a paged document.

/// Extensions accepted for upload, compared case-insensitively.
pub const ACCEPTED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "pdf"];

/// Text after the last `.` of `name`, lowercased.
#[must_use]
pub fn extension(name: &str) -> Option<String> {
    name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase())
}

#[must_use]
pub fn is_accepted(name: &str) -> bool {
    extension(name).is_some_and(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str()))
}

#[must_use]
pub fn is_pdf(name: &str) -> bool {
    extension(name).is_some_and(|ext| ext == "pdf")
}

/// Page images of a multi-page document with a cursor that never leaves bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSet {
    pdf_id: String,
    images: Vec<String>,
    current: usize,
}

impl PageSet {
    /// `None` when `images` is empty.
    #[must_use]
    pub fn new(pdf_id: impl Into<String>, images: Vec<String>) -> Option<Self> {
        if images.is_empty() {
            return None;
        }
        Some(Self {
            pdf_id: pdf_id.into(),
            images,
            current: 0,
        })
    }

    #[must_use]
    pub fn pdf_id(&self) -> &str {
        &self.pdf_id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Zero-based index of the shown page.
    #[must_use]
    pub fn current(&self) -> usize {
        self.current
    }

    /// Image the upload reply named first; requests for the document use it.
    #[must_use]
    pub fn first_image(&self) -> &str {
        &self.images[0]
    }

    #[must_use]
    pub fn current_image(&self) -> &str {
        &self.images[self.current]
    }

    #[must_use]
    pub fn can_prev(&self) -> bool {
        self.current > 0
    }

    #[must_use]
    pub fn can_next(&self) -> bool {
        self.current + 1 < self.images.len()
    }

    /// Step back one page; `false` if already on the first.
    pub fn prev(&mut self) -> bool {
        if self.can_prev() {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    /// Step forward one page; `false` if already on the last.
    pub fn next(&mut self) -> bool {
        if self.can_next() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// "Page i of n", one-based.
    #[must_use]
    pub fn label(&self) -> String {
        format!("Page {} of {}", self.current + 1, self.images.len())
    }

    /// Where the backend serves the current page image.
    #[must_use]
    pub fn image_url(&self, base_url: &str) -> String {
        format!(
            "{}/uploads/{}/{}",
            base_url.trim_end_matches('/'),
            self.pdf_id,
            self.current_image()
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Document {
    #[default]
    Empty,
    Image {
        filename: String,
    },
    Paged(PageSet),
}

impl Document {
    /// Server-side name extraction and chat are keyed by.
    ///
    /// For a paged document this is the first page image, whichever page is shown.
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::Image { filename } => Some(filename),
            Self::Paged(pages) => Some(pages.first_image()),
        }
    }

    #[must_use]
    pub fn pdf_id(&self) -> Option<&str> {
        match self {
            Self::Paged(pages) => Some(pages.pdf_id()),
            _ => None,
        }
    }

    #[must_use]
    pub fn pages(&self) -> Option<&PageSet> {
        match self {
            Self::Paged(pages) => Some(pages),
            _ => None,
        }
    }

    pub fn pages_mut(&mut self) -> Option<&mut PageSet> {
        match self {
            Self::Paged(pages) => Some(pages),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        !matches!(self, Self::Empty)
    }
}
