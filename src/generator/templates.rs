use askama::Template;

/// Template data for `edit.js`
#[derive(Template)]
#[template(path = "edit.js.txt", escape = "none")]
pub struct EditJsTemplate {
    /// Component slug
    pub slug: String,
    /// Grouped import lines, one per capability namespace
    pub imports: String,
    /// Serialized sidebar panels
    pub controls: String,
    /// Indented preview JSX
    pub preview: String,
}

/// Template data for `render.php`
#[derive(Template)]
#[template(path = "render.php.txt", escape = "none")]
pub struct RenderPhpTemplate {
    pub slug: String,
    /// Interpolated template markup
    pub body: String,
}

/// Template data for the scaffolded `index.js`
#[derive(Template)]
#[template(path = "index.js.txt", escape = "none")]
pub struct IndexJsTemplate {
    pub title: String,
    /// PascalCase component name used for the edit import
    pub pascal: String,
}

/// Template data for the scaffolded `save.js`
#[derive(Template)]
#[template(path = "save.js.txt", escape = "none")]
pub struct SaveJsTemplate {
    pub title: String,
}

/// Template data for the scaffolded `editor.scss`
#[derive(Template)]
#[template(path = "editor.scss.txt", escape = "none")]
pub struct EditorScssTemplate {
    pub title: String,
    /// Block name with `/` replaced by `-`, as used in the wrapper class
    pub namespace_class: String,
}

/// One row of the field reference table
#[derive(Debug, Clone)]
pub struct CheatSheetRow {
    pub label: String,
    pub key: String,
    pub type_tag: String,
    pub tokens: String,
}

/// Example markup for one loop field
#[derive(Debug, Clone)]
pub struct CheatSheetLoop {
    pub label: String,
    pub example: String,
}

/// Template data for `fields.md`
#[derive(Template)]
#[template(path = "fields.md.txt", escape = "none")]
pub struct FieldsMdTemplate {
    pub slug: String,
    pub rows: Vec<CheatSheetRow>,
    pub loops: Vec<CheatSheetLoop>,
}
