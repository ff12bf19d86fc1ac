use serde::{Deserialize, Serialize};

/// Outline of an argumentative text as edited by the student.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArgumentStructure {
    pub title: String,
    pub structure_type: String,
    #[serde(default)]
    pub main_points: Vec<String>,
    #[serde(default)]
    pub body: String,
}

/// Prose-free condensation of an [`ArgumentStructure`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompressedStructure {
    pub title: String,
    pub structure_type: String,
    /// At most four keyword summaries.
    pub points: Vec<String>,
}

impl CompressedStructure {
    /// One-line rendering for prompt splicing.
    pub fn render(&self) -> String {
        let mut line = format!("{} ({})", self.title, self.structure_type);
        if !self.points.is_empty() {
            line.push_str(": ");
            line.push_str(&self.points.join("; "));
        }
        line
    }
}
