//! Accessibility roles carried by nodes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The accessibility role of a node.
///
/// The combiner never interprets roles; they are carried through to the
/// combined tree unchanged. `IFrame` and `Portal` are the roles that
/// conventionally host an embedded child tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Role {
    /// A node with no specific role.
    #[default]
    Unknown,

    /// The root of a document.
    RootWebArea,

    /// A top-level window.
    Window,

    /// A dialog box.
    Dialog,

    /// A generic container.
    GenericContainer,

    /// A frame hosting another document.
    IFrame,

    /// A portal hosting another document.
    Portal,

    /// An embedded plugin or object.
    EmbeddedObject,

    /// A push button.
    Button,

    /// A checkbox that can be checked or unchecked.
    CheckBox,

    /// A radio button (mutually exclusive selection).
    RadioButton,

    /// A group of radio buttons.
    RadioGroup,

    /// An editable text field.
    TextField,

    /// Static text.
    StaticText,

    /// A hyperlink.
    Link,

    /// An image.
    Image,

    /// A heading.
    Heading,

    /// A paragraph.
    Paragraph,

    /// A list of items.
    List,

    /// An item within a list.
    ListItem,

    /// A table.
    Table,

    /// A row within a table.
    Row,

    /// A cell within a table.
    Cell,

    /// A column header.
    ColumnHeader,

    /// A row header.
    RowHeader,

    /// A popup menu.
    Menu,

    /// An item within a menu.
    MenuItem,

    /// A tooltip.
    Tooltip,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Unknown => "unknown",
            Role::RootWebArea => "rootWebArea",
            Role::Window => "window",
            Role::Dialog => "dialog",
            Role::GenericContainer => "genericContainer",
            Role::IFrame => "iframe",
            Role::Portal => "portal",
            Role::EmbeddedObject => "embeddedObject",
            Role::Button => "button",
            Role::CheckBox => "checkBox",
            Role::RadioButton => "radioButton",
            Role::RadioGroup => "radioGroup",
            Role::TextField => "textField",
            Role::StaticText => "staticText",
            Role::Link => "link",
            Role::Image => "image",
            Role::Heading => "heading",
            Role::Paragraph => "paragraph",
            Role::List => "list",
            Role::ListItem => "listItem",
            Role::Table => "table",
            Role::Row => "row",
            Role::Cell => "cell",
            Role::ColumnHeader => "columnHeader",
            Role::RowHeader => "rowHeader",
            Role::Menu => "menu",
            Role::MenuItem => "menuItem",
            Role::Tooltip => "tooltip",
        };
        f.write_str(name)
    }
}
