use std::rc::Rc;

use crate::component::TrackSlot;

/// Embed which the UI should bring to the front.
#[derive(Clone, Debug)]
pub enum HighlightedEmbed {
    /// Slot which has just started streaming a screen share.
    Streamable(Rc<TrackSlot>),
}

/// Sink of the UI embed highlighting.
pub trait EmbedHighlighter {
    fn highlight(&self, embed: HighlightedEmbed);
}
