//! Prompt assembly.
//!
//! `PromptAssembler` is a pure function of the question and the resolved
//! file contents: no I/O, no validation, byte-stable output. Callers reject
//! empty questions before assembling.

use std::collections::HashSet;

/// Fixed system instruction sent with every request.
pub const SYSTEM_INSTRUCTION: &str = "Answer the coding questions. Only provide the code and \
documentation, explaining the solution after providing the code. Put each code snippet inside \
a fenced ``` code block and write the source file name above each snippet.";

/// One file's identifier and its full current text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBlock {
    pub id: String,
    pub content: String,
}

impl FileBlock {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
        }
    }

    /// The id on its own line, then every content line indented by one tab.
    fn render_into(&self, out: &mut String) {
        out.push_str(&self.id);
        for line in self.content.split('\n') {
            out.push('\n');
            out.push('\t');
            out.push_str(line);
        }
    }
}

/// Immutable input of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub question: String,
    pub file_blocks: Vec<FileBlock>,
}

impl PromptRequest {
    pub fn new(question: impl Into<String>, file_blocks: Vec<FileBlock>) -> Self {
        Self {
            question: question.into(),
            file_blocks,
        }
    }
}

/// The single outbound request: system instruction plus user content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledPrompt {
    pub system: &'static str,
    pub user: String,
    /// Ids of the file blocks included, in order.
    pub file_ids: Vec<String>,
}

impl AssembledPrompt {
    /// Flatten to one request string: system instruction, blank line, user content.
    pub fn to_text(&self) -> String {
        format!("{}\n\n{}", self.system, self.user)
    }
}

pub struct PromptAssembler;

impl PromptAssembler {
    /// Assemble the question and files, in the order given.
    ///
    /// A repeated id is emitted once (first occurrence).
    pub fn assemble(question: &str, files: &[FileBlock]) -> AssembledPrompt {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut file_ids = Vec::new();
        let mut blocks = String::new();

        for file in files {
            if !seen.insert(file.id.as_str()) {
                continue;
            }
            if !blocks.is_empty() {
                blocks.push_str("\n\n");
            }
            file.render_into(&mut blocks);
            file_ids.push(file.id.clone());
        }

        let user = if blocks.is_empty() {
            question.to_string()
        } else {
            format!("{question}\n{blocks}")
        };

        AssembledPrompt {
            system: SYSTEM_INSTRUCTION,
            user,
            file_ids,
        }
    }

    pub fn assemble_request(request: &PromptRequest) -> AssembledPrompt {
        Self::assemble(&request.question, &request.file_blocks)
    }
}
