//! Prompt templates for completion tools

/// Facts gathered from the cluster before an analysis request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterFacts {
    pub namespace_count: usize,
    /// First few namespace names, used when no namespace was requested
    pub sample_namespaces: Vec<String>,
    pub namespace: Option<NamespaceFacts>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceFacts {
    pub name: String,
    pub pods: usize,
    pub services: usize,
    pub routes: usize,
}

impl ClusterFacts {
    pub fn render(&self) -> String {
        let mut lines = vec![
            "Cluster Information:".to_string(),
            format!("- Total namespaces: {}", self.namespace_count),
        ];
        match &self.namespace {
            Some(ns) => {
                lines.push(format!("- Current namespace: {}", ns.name));
                lines.push(format!("- Pods in namespace: {}", ns.pods));
                lines.push(format!("- Services in namespace: {}", ns.services));
                lines.push(format!("- Routes in namespace: {}", ns.routes));
            }
            None => lines.push(format!(
                "- Namespace names: {}",
                self.sample_namespaces.join(", ")
            )),
        }
        lines.join("\n")
    }
}

/// Question with optional caller and cluster context prepended.
pub fn ask(question: &str, context: &[&str]) -> String {
    let context: Vec<&str> = context
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect();
    if context.is_empty() {
        question.to_string()
    } else {
        format!("{}\n\n{question}", context.join("\n\n"))
    }
}

pub fn cluster_analysis(facts: &ClusterFacts) -> String {
    format!(
        "Please analyze this OpenShift cluster and provide:\n\
         1. Overall health assessment\n\
         2. Key observations\n\
         3. Recommendations for optimization\n\
         4. Potential issues to watch for\n\n\
         {}",
        facts.render()
    )
}

pub fn troubleshooting(issue: &str, error_messages: Option<&str>, context: Option<&str>) -> String {
    let mut prompt = format!(
        "I'm experiencing an OpenShift issue and need help troubleshooting:\n\nIssue: {issue}\n"
    );
    if let Some(errors) = error_messages.filter(|e| !e.trim().is_empty()) {
        prompt.push_str(&format!("\nError messages/logs: {errors}\n"));
    }
    if let Some(context) = context {
        prompt.push_str(&format!("\n{context}\n"));
    }
    prompt.push_str(
        "\nPlease provide:\n\
         1. Possible causes of this issue\n\
         2. Step-by-step troubleshooting steps\n\
         3. Commands to run for diagnosis\n\
         4. Prevention tips for the future\n\
         5. When to contact support",
    );
    prompt
}
