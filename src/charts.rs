use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// ChartKind
///
/// Registration groups understood by the chart library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Controller,
    Element,
    Scale,
    Plugin,
}

/// ChartComponent
///
/// Every component the dashboards draw with. Controllers pick the chart type,
/// elements draw the marks, scales map the axes, plugins add chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ChartComponent {
    BarController,
    LineController,
    DoughnutController,
    PieController,
    BarElement,
    LineElement,
    PointElement,
    ArcElement,
    CategoryScale,
    LinearScale,
    Title,
    Tooltip,
    Legend,
}

impl ChartComponent {
    pub const ALL: [ChartComponent; 13] = [
        ChartComponent::BarController,
        ChartComponent::LineController,
        ChartComponent::DoughnutController,
        ChartComponent::PieController,
        ChartComponent::BarElement,
        ChartComponent::LineElement,
        ChartComponent::PointElement,
        ChartComponent::ArcElement,
        ChartComponent::CategoryScale,
        ChartComponent::LinearScale,
        ChartComponent::Title,
        ChartComponent::Tooltip,
        ChartComponent::Legend,
    ];

    pub fn kind(self) -> ChartKind {
        match self {
            ChartComponent::BarController
            | ChartComponent::LineController
            | ChartComponent::DoughnutController
            | ChartComponent::PieController => ChartKind::Controller,
            ChartComponent::BarElement
            | ChartComponent::LineElement
            | ChartComponent::PointElement
            | ChartComponent::ArcElement => ChartKind::Element,
            ChartComponent::CategoryScale | ChartComponent::LinearScale => ChartKind::Scale,
            ChartComponent::Title | ChartComponent::Tooltip | ChartComponent::Legend => {
                ChartKind::Plugin
            }
        }
    }
}

/// ChartRegistry
///
/// The set of registered components. Built once; read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartRegistry {
    components: BTreeSet<ChartComponent>,
}

impl ChartRegistry {
    pub fn standard() -> Self {
        Self {
            components: ChartComponent::ALL.into_iter().collect(),
        }
    }

    pub fn contains(&self, component: ChartComponent) -> bool {
        self.components.contains(&component)
    }

    pub fn of_kind(&self, kind: ChartKind) -> Vec<ChartComponent> {
        self.components
            .iter()
            .copied()
            .filter(|component| component.kind() == kind)
            .collect()
    }

    pub fn components(&self) -> impl Iterator<Item = ChartComponent> + '_ {
        self.components.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

static REGISTRY: OnceLock<ChartRegistry> = OnceLock::new();

/// install
///
/// Registers the standard components once per process and returns the shared
/// registry. Later calls are no-ops returning the same instance.
pub fn install() -> &'static ChartRegistry {
    REGISTRY.get_or_init(|| {
        let registry = ChartRegistry::standard();
        tracing::info!(components = registry.len(), "chart components registered");
        registry
    })
}
