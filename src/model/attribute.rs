//! Attribute kinds attached to nodes
//!
//! Attributes are stored per value type as ordered `(kind, value)` lists.
//! A fixed subset of the int and int-list kinds hold node ids; those are
//! the ones the combiner rewrites into the global id space.

use serde::{Deserialize, Serialize};

/// Classification shared by every attribute kind enum
pub trait AttributeKind: Copy + Eq {
    /// Whether values of this kind are node ids in the owning tree
    fn is_node_reference(&self) -> bool {
        false
    }
}

/// String-valued attributes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StringAttribute {
    Name,
    Description,
    Value,
    Placeholder,
    Url,
    ClassName,
    Language,
    /// The string form of a [`TreeId`](crate::TreeId) naming an embedded child tree
    ChildTreeId,
}

impl AttributeKind for StringAttribute {}

/// Int-valued attributes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntAttribute {
    ScrollX,
    ScrollY,
    HierarchicalLevel,
    PosInSet,
    SetSize,
    TextSelStart,
    TextSelEnd,
    TableRowCount,
    TableColumnCount,
    TableRowIndex,
    TableColumnIndex,
    Color,
    BackgroundColor,
    // Node references
    ActiveDescendant,
    InPageLinkTarget,
    ErrorMessage,
    MemberOf,
    NextOnLine,
    PreviousOnLine,
    PopupFor,
    TableHeader,
    TableColumnHeader,
    TableRowHeader,
    NextFocus,
    PreviousFocus,
}

impl AttributeKind for IntAttribute {
    fn is_node_reference(&self) -> bool {
        matches!(
            self,
            IntAttribute::ActiveDescendant
                | IntAttribute::InPageLinkTarget
                | IntAttribute::ErrorMessage
                | IntAttribute::MemberOf
                | IntAttribute::NextOnLine
                | IntAttribute::PreviousOnLine
                | IntAttribute::PopupFor
                | IntAttribute::TableHeader
                | IntAttribute::TableColumnHeader
                | IntAttribute::TableRowHeader
                | IntAttribute::NextFocus
                | IntAttribute::PreviousFocus
        )
    }
}

/// Int-list-valued attributes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntListAttribute {
    CharacterOffsets,
    WordStarts,
    WordEnds,
    MarkerTypes,
    MarkerStarts,
    MarkerEnds,
    // Node references
    Controls,
    Details,
    DescribedBy,
    FlowTo,
    IndirectChildren,
    LabelledBy,
    RadioGroup,
}

impl AttributeKind for IntListAttribute {
    fn is_node_reference(&self) -> bool {
        matches!(
            self,
            IntListAttribute::Controls
                | IntListAttribute::Details
                | IntListAttribute::DescribedBy
                | IntListAttribute::FlowTo
                | IntListAttribute::IndirectChildren
                | IntListAttribute::LabelledBy
                | IntListAttribute::RadioGroup
        )
    }
}

/// Bool-valued attributes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoolAttribute {
    Busy,
    Modal,
    Selected,
    Editable,
    Scrollable,
    Clickable,
}

impl AttributeKind for BoolAttribute {}

/// Float-valued attributes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FloatAttribute {
    ValueForRange,
    MinValueForRange,
    MaxValueForRange,
    StepValueForRange,
    FontSize,
    FontWeight,
}

impl AttributeKind for FloatAttribute {}
