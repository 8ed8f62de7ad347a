// Built-in starter catalogue used by `init` and fresh installs

use tracing::warn;

use crate::models::{
    AssessmentQuestion, ContentBlock, ContentKind, DifficultyLevel, LearningModule,
    ModuleCategory, Scenario, ScenarioOption,
};
use crate::platform::Platform;

pub const INTRO_TITLE: &str = "Introduction to Artificial Intelligence";
pub const ETHICS_TITLE: &str = "AI Ethics and Bias";
pub const HIRING_SCENARIO_TITLE: &str = "AI-Powered Hiring System";

pub fn seed(platform: &mut Platform) {
    let intro = intro_module();
    let mut ethics = ethics_module();
    ethics.prerequisites.push(intro.id);

    let modules = [intro, ethics];
    for module in modules {
        if let Err(e) = platform.add_module(module) {
            warn!(error = %e, "skipped sample module");
        }
    }
    if let Err(e) = platform.add_scenario(hiring_scenario()) {
        warn!(error = %e, "skipped sample scenario");
    }
}

fn intro_module() -> LearningModule {
    let mut module = LearningModule::new(
        INTRO_TITLE,
        "Foundational concepts of AI, machine learning, and their real-world applications",
        ModuleCategory::AiBasics,
        DifficultyLevel::Beginner,
    );
    module.content_blocks = vec![
        ContentBlock::new(
            ContentKind::Text,
            "What is AI?",
            "Artificial Intelligence refers to computer systems that can perform tasks typically requiring human intelligence...",
        ),
        ContentBlock::new(
            ContentKind::Interactive,
            "AI vs Machine Learning vs Deep Learning",
            "Interactive diagram showing the relationship between these concepts",
        ),
        ContentBlock::new(
            ContentKind::Video,
            "AI in Daily Life",
            "Examples of AI applications you encounter every day",
        ),
    ];
    module.assessment_questions = vec![AssessmentQuestion {
        question: "Which of the following is NOT a type of machine learning?".to_string(),
        options: vec![
            "Supervised Learning".to_string(),
            "Unsupervised Learning".to_string(),
            "Reinforcement Learning".to_string(),
            "Quantum Learning".to_string(),
        ],
        correct: 3,
        explanation: "Quantum Learning is not a recognized type of machine learning paradigm."
            .to_string(),
    }];
    module
}

fn ethics_module() -> LearningModule {
    let mut module = LearningModule::new(
        ETHICS_TITLE,
        "Understanding ethical implications, bias detection, and responsible AI use",
        ModuleCategory::EthicsBias,
        DifficultyLevel::Intermediate,
    );
    module.content_blocks = vec![
        ContentBlock::new(
            ContentKind::CaseStudy,
            "Algorithmic Bias in Hiring",
            "Real-world examples of how AI systems can perpetuate discrimination",
        ),
        ContentBlock::new(
            ContentKind::Interactive,
            "Bias Detection Exercise",
            "Interactive tool to identify potential bias in AI systems",
        ),
    ];
    module
}

fn hiring_scenario() -> Scenario {
    let mut scenario = Scenario::new(
        HIRING_SCENARIO_TITLE,
        "You're implementing an AI system to screen job applications",
    );
    scenario.context = "Your company wants to automate the initial screening of resumes using AI to save time and reduce human bias.".to_string();
    scenario.challenge =
        "How do you ensure the AI system doesn't discriminate against qualified candidates?"
            .to_string();
    scenario.options = vec![
        ScenarioOption {
            text: "Use historical hiring data to train the model".to_string(),
            consequence: "Risk of perpetuating past biases".to_string(),
            ethics_score: 2,
        },
        ScenarioOption {
            text: "Implement bias detection and regular auditing".to_string(),
            consequence: "Better fairness but requires ongoing monitoring".to_string(),
            ethics_score: 8,
        },
        ScenarioOption {
            text: "Focus only on technical skills and ignore demographics".to_string(),
            consequence: "May miss important soft skills and context".to_string(),
            ethics_score: 6,
        },
    ];
    scenario.ethical_considerations = vec![
        "Fairness and non-discrimination".to_string(),
        "Transparency in decision-making".to_string(),
        "Accountability for AI decisions".to_string(),
    ];
    scenario.learning_objectives = vec![
        "Identify potential sources of bias in AI systems".to_string(),
        "Understand the importance of diverse training data".to_string(),
        "Learn strategies for ongoing bias monitoring".to_string(),
    ];
    scenario
}
