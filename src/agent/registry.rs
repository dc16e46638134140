//! Agent registry — language specialists and the triage agent.
//!
//! All five definitions are built deterministically from fixed instruction
//! text. Routing intelligence lives entirely in the remote model: the triage
//! agent's prompt names the candidates, and the model picks one. No local
//! classification happens here.

use std::sync::Arc;

/// Languages covered by the specialist agents, in handoff order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Spanish,
    French,
    German,
}

impl Language {
    /// Fixed handoff order: English, Spanish, French, German.
    pub const ALL: [Language; 4] = [
        Language::English,
        Language::Spanish,
        Language::French,
        Language::German,
    ];

    /// English display name of the language.
    pub fn display(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Spanish",
            Language::French => "French",
            Language::German => "German",
        }
    }

    /// Agent name used in the triage routing prompt.
    pub fn agent_name(&self) -> &'static str {
        match self {
            Language::English => "EnglishAgent",
            Language::Spanish => "SpanishAgent",
            Language::French => "FrenchAgent",
            Language::German => "GermanAgent",
        }
    }

    /// Fixed refusal sentence, in the specialist's own language, for
    /// off-topic queries. Refusals are ordinary model output, never an error.
    fn refusal(&self) -> &'static str {
        match self {
            Language::English => {
                "I'm here to help with English language topics only. \
                 Please ask an English-related question."
            }
            Language::Spanish => {
                "Estoy aquí solo para ayudarte con temas relacionados con el idioma español. \
                 Por favor, haz una pregunta relacionada con el español."
            }
            Language::French => {
                "Je suis ici uniquement pour vous aider avec des sujets liés à la langue française. \
                 Veuillez poser une question en rapport avec le français."
            }
            Language::German => {
                "Ich bin nur hier, um dir bei Themen zur deutschen Sprache zu helfen. \
                 Bitte stelle eine frage, die sich auf Deutsch bezieht."
            }
        }
    }

    fn instructions(&self) -> String {
        let lang = self.display();
        format!(
            "You are a helpful AI assistant specialized in the {lang} language. \
             You assist only with {lang}-related topics such as grammar, vocabulary, \
             writing, reading comprehension, and literature. \
             If the user asks something unrelated to {lang}, politely respond with: '{}'",
            self.refusal()
        )
    }

    /// Candidate line rendered into the triage routing prompt.
    fn routing_line(&self) -> String {
        match self {
            Language::English => format!(
                "- '{}' for English language topics (grammar, vocabulary, writing, etc.)",
                self.agent_name()
            ),
            other => format!(
                "- '{}' for {} language topics",
                other.agent_name(),
                other.display()
            ),
        }
    }
}

/// What an agent is: a single-language specialist, or the triage front door
/// holding the ordered handoff candidates.
///
/// A specialist carrying handoffs is unrepresentable.
#[derive(Debug, Clone)]
pub enum AgentKind {
    Specialist(Language),
    Triage { handoffs: Vec<Arc<Agent>> },
}

/// An immutable agent definition: name, instruction text, and kind.
///
/// Built once per session start, shared read-only afterwards.
#[derive(Debug)]
pub struct Agent {
    pub name: String,
    pub instructions: String,
    pub kind: AgentKind,
}

impl Agent {
    fn specialist(language: Language) -> Self {
        Self {
            name: language.agent_name().to_string(),
            instructions: language.instructions(),
            kind: AgentKind::Specialist(language),
        }
    }

    fn triage(handoffs: Vec<Arc<Agent>>) -> Self {
        Self {
            name: "TriageAgent".to_string(),
            instructions: "You are a triage agent that identifies the user's intent based on \
                           their first message. Route the user to one of the following \
                           specialized agents:\n"
                .to_string(),
            kind: AgentKind::Triage { handoffs },
        }
    }

    /// Handoff candidates, in fixed order. Empty for specialists.
    pub fn handoffs(&self) -> &[Arc<Agent>] {
        match &self.kind {
            AgentKind::Triage { handoffs } => handoffs,
            AgentKind::Specialist(_) => &[],
        }
    }

    pub fn is_triage(&self) -> bool {
        matches!(self.kind, AgentKind::Triage { .. })
    }

    /// Full system instructions sent to the remote model.
    ///
    /// For the triage agent the candidate list is rendered from the handoffs
    /// in order, so the order is part of the prompt the model sees.
    pub fn system_prompt(&self) -> String {
        match &self.kind {
            AgentKind::Specialist(_) => self.instructions.clone(),
            AgentKind::Triage { handoffs } => {
                let mut prompt = self.instructions.clone();
                for agent in handoffs {
                    if let AgentKind::Specialist(language) = agent.kind {
                        prompt.push_str(&language.routing_line());
                        prompt.push('\n');
                    }
                }
                prompt.push_str(
                    "If the topic is unclear or unrelated, ask the user to clarify their request.",
                );
                prompt
            }
        }
    }
}

/// The fixed set of five agents: four specialists plus triage.
#[derive(Debug)]
pub struct AgentRegistry {
    pub specialists: Vec<Arc<Agent>>,
    pub triage: Arc<Agent>,
}

impl AgentRegistry {
    /// Build the registry. Deterministic: same names, instructions, and
    /// handoff order on every call.
    pub fn build() -> Self {
        let specialists: Vec<Arc<Agent>> = Language::ALL
            .iter()
            .map(|language| Arc::new(Agent::specialist(*language)))
            .collect();

        let triage = Arc::new(Agent::triage(specialists.clone()));

        Self {
            specialists,
            triage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_determinism() {
        let a = AgentRegistry::build();
        let b = AgentRegistry::build();

        assert_eq!(a.triage.name, b.triage.name);
        assert_eq!(a.triage.instructions, b.triage.instructions);

        let names_a: Vec<_> = a.triage.handoffs().iter().map(|s| s.name.clone()).collect();
        let names_b: Vec<_> = b.triage.handoffs().iter().map(|s| s.name.clone()).collect();
        assert_eq!(names_a, names_b);
    }

    #[test]
    fn test_handoff_order() {
        let registry = AgentRegistry::build();
        let names: Vec<_> = registry
            .triage
            .handoffs()
            .iter()
            .map(|s| s.name.as_str())
            .collect();

        assert_eq!(
            names,
            ["EnglishAgent", "SpanishAgent", "FrenchAgent", "GermanAgent"]
        );
    }

    #[test]
    fn test_specialists_never_hold_handoffs() {
        let registry = AgentRegistry::build();
        for specialist in &registry.specialists {
            assert!(!specialist.is_triage());
            assert!(specialist.handoffs().is_empty());
        }
    }

    #[test]
    fn test_specialist_instructions_end_with_refusal() {
        let registry = AgentRegistry::build();
        let spanish = &registry.specialists[1];
        assert!(spanish
            .instructions
            .ends_with("haz una pregunta relacionada con el español.'"));
    }

    #[test]
    fn test_triage_prompt_lists_candidates_in_order() {
        let registry = AgentRegistry::build();
        let prompt = registry.triage.system_prompt();

        let english = prompt.find("'EnglishAgent'").unwrap();
        let spanish = prompt.find("'SpanishAgent'").unwrap();
        let french = prompt.find("'FrenchAgent'").unwrap();
        let german = prompt.find("'GermanAgent'").unwrap();

        assert!(english < spanish && spanish < french && french < german);
        assert!(prompt.ends_with("ask the user to clarify their request."));
    }
}
