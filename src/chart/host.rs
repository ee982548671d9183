//! Ownership of the one chart on screen
//!
//! Each installed chart gets a fresh plot id, so egui_plot never reuses the
//! zoom and pan memory of an earlier chart. Ids of dropped charts are queued
//! until the UI removes their memory on the next frame.

use egui::Id;

use super::Chart;

/// A chart together with the identity of its drawing surface
#[derive(Debug)]
pub struct HostedChart {
    chart: Chart,
    plot_id: Id,
    generation: u64,
}

impl HostedChart {
    pub fn chart(&self) -> &Chart {
        &self.chart
    }

    /// egui_plot memory key of this chart's plot
    pub fn plot_id(&self) -> Id {
        self.plot_id
    }

    #[cfg(test)]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Default)]
pub struct ChartHost {
    current: Option<HostedChart>,
    generation: u64,
    released: Vec<Id>,
}

impl ChartHost {
    /// Replace the hosted chart; the previous one is dropped first
    pub fn install(&mut self, chart: Chart) -> &HostedChart {
        self.clear();
        self.generation += 1;
        let plot_id = Id::new(("chart_plot", self.generation));
        tracing::debug!(generation = self.generation, "chart installed");
        self.current.insert(HostedChart {
            chart,
            plot_id,
            generation: self.generation,
        })
    }

    /// Drop the hosted chart. Returns false when there was none.
    pub fn clear(&mut self) -> bool {
        match self.current.take() {
            Some(old) => {
                tracing::debug!(generation = old.generation, "chart released");
                self.released.push(old.plot_id);
                true
            }
            None => false,
        }
    }

    pub fn current(&self) -> Option<&HostedChart> {
        self.current.as_ref()
    }

    pub fn chart(&self) -> Option<&Chart> {
        self.current.as_ref().map(HostedChart::chart)
    }

    pub fn has_chart(&self) -> bool {
        self.current.is_some()
    }

    /// Charts currently alive: zero or one
    #[cfg(test)]
    pub fn live_count(&self) -> usize {
        usize::from(self.current.is_some())
    }

    /// Plot ids whose egui memory should be removed
    pub fn take_released(&mut self) -> Vec<Id> {
        std::mem::take(&mut self.released)
    }

    #[cfg(test)]
    pub fn pending_release(&self) -> usize {
        self.released.len()
    }
}
