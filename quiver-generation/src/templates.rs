//! Prompt templates, one per routing table entry.
//!
//! Templates only shape the instruction; evidence formatting is shared.
//! An unknown template id renders as `grounded`.

use quiver_core::context::RankedContext;
use quiver_core::query::Query;

/// Render the prompt for a template id.
pub fn render(template: &str, query: &Query, context: &RankedContext) -> String {
    let evidence = format_evidence(context);
    let question = &query.text;

    match template {
        "definition" => format!(
            "Answer the question concisely using only the evidence below. \
             If the evidence does not contain the answer, say so.\n\n\
             Evidence:\n{evidence}\n\nQuestion: {question}\nAnswer:"
        ),
        "comparison" => format!(
            "Compare the subjects of the question point by point, using only \
             the evidence below. State similarities, then differences.\n\n\
             Evidence:\n{evidence}\n\nQuestion: {question}\nComparison:"
        ),
        "temporal" => format!(
            "Answer the question, paying attention to dates and ordering of \
             events in the evidence below.\n\n\
             Evidence:\n{evidence}\n\nQuestion: {question}\nAnswer:"
        ),
        "synthesis" => format!(
            "The question requires combining several pieces of evidence. \
             Reason step by step over the evidence below, then answer.\n\n\
             Evidence:\n{evidence}\n\nQuestion: {question}\nReasoning and answer:"
        ),
        _ => format!(
            "Use the evidence below to answer the question. Cite evidence \
             numbers where relevant.\n\n\
             Evidence:\n{evidence}\n\nQuestion: {question}\nAnswer:"
        ),
    }
}

fn format_evidence(context: &RankedContext) -> String {
    if context.is_empty() {
        return "(no evidence retrieved)".to_string();
    }
    context
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("[{}] {}", i + 1, item.candidate.content.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}
