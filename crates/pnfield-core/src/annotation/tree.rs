use tracing::trace;

use super::{
    Annotation, AnnotationHandle, AnnotationSink, Diagnostic, DiagnosticKind, DiagnosticSink,
};
use crate::registry::FieldRegistry;

/// In-memory sink keeping annotations in emission order.
#[derive(Debug, Default, Clone)]
pub struct AnnotationTree {
    nodes: Vec<Annotation>,
    diagnostics: Vec<Diagnostic>,
}

impl AnnotationTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[Annotation] {
        &self.nodes
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn get(&self, item: AnnotationHandle) -> Option<&Annotation> {
        self.nodes.get(item.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Display line for one annotation: its preformatted text when present,
    /// otherwise `name: value`, followed by any appended text.
    pub fn label(&self, registry: &FieldRegistry, item: AnnotationHandle) -> Option<String> {
        let node = self.get(item)?;
        let mut line = match &node.text {
            Some(text) => text.clone(),
            None => {
                let name = registry
                    .info(node.field)
                    .map(|info| info.name.as_str())
                    .unwrap_or("?");
                format!("{name}: {}", node.value)
            }
        };
        line.push_str(&node.appended);
        Some(line)
    }

    /// Render every annotation as one display line.
    pub fn render(&self, registry: &FieldRegistry) -> Vec<String> {
        (0..self.nodes.len())
            .filter_map(|idx| self.label(registry, AnnotationHandle(idx)))
            .collect()
    }
}

impl AnnotationSink for AnnotationTree {
    fn add(&mut self, annotation: Annotation) -> AnnotationHandle {
        trace!(
            field = annotation.field.index(),
            start = annotation.range.start,
            end = annotation.range.end,
            "annotation added"
        );
        self.nodes.push(annotation);
        AnnotationHandle(self.nodes.len() - 1)
    }

    fn append_text(&mut self, item: AnnotationHandle, text: &str) {
        if let Some(node) = self.nodes.get_mut(item.0) {
            node.appended.push_str(text);
        }
    }
}

impl DiagnosticSink for AnnotationTree {
    fn flag(&mut self, item: AnnotationHandle, kind: DiagnosticKind, message: String) {
        self.diagnostics.push(Diagnostic {
            item,
            kind,
            severity: kind.severity(),
            message,
        });
    }
}
