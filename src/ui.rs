use crate::config::{AllocationStrategy, AppConfig, CONFIG_PATH};
use crate::engine::{self, Metric, ReconciliationWarning};
use crate::filter::{self, FilterCriteria};
use crate::loader::load_records;
use crate::model::{AggregateTotals, OrderLine, OutletTotals, ProductRecord, TopEntry};
use crate::orders::compute_order_lines;
use eframe::egui;
use egui::{Color32, Context, FontFamily, FontId, Margin, RichText, Stroke, Vec2, Visuals};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Legend, Plot};
use std::collections::{HashMap, HashSet};
use tracing::error;

pub fn set_custom_style(ctx: &Context) {
    // Dark slate theme with teal accents
    let mut visuals = Visuals::dark();

    visuals.panel_fill = Color32::from_rgb(16, 20, 24);
    visuals.window_fill = Color32::from_rgb(22, 27, 32);
    visuals.extreme_bg_color = Color32::from_rgb(30, 38, 44);
    visuals.faint_bg_color = Color32::from_rgb(26, 33, 38);

    visuals.widgets.inactive.bg_fill = Color32::from_rgb(36, 45, 52);
    visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, Color32::from_rgb(55, 70, 80));

    visuals.widgets.hovered.bg_fill = Color32::from_rgb(45, 60, 70);
    visuals.widgets.hovered.bg_stroke = Stroke::new(2.0, Color32::from_rgb(80, 180, 190));

    visuals.widgets.active.bg_fill = Color32::from_rgb(50, 70, 82);
    visuals.widgets.active.bg_stroke = Stroke::new(2.0, Color32::from_rgb(110, 220, 230));

    visuals.selection.bg_fill = Color32::from_rgb(40, 80, 90);
    visuals.selection.stroke = Stroke::new(1.0, Color32::from_rgb(120, 230, 240));

    ctx.set_visuals(visuals);

    let mut style = (*ctx.style()).clone();

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.window_margin = Margin::same(12);
    style.spacing.button_padding = egui::vec2(12.0, 8.0);
    style.spacing.indent = 16.0;

    style.text_styles.insert(
        egui::TextStyle::Body,
        FontId::new(15.0, FontFamily::Proportional),
    );
    style.text_styles.insert(
        egui::TextStyle::Heading,
        FontId::new(22.0, FontFamily::Proportional),
    );
    style.text_styles.insert(
        egui::TextStyle::Button,
        FontId::new(15.0, FontFamily::Proportional),
    );
    style.text_styles.insert(
        egui::TextStyle::Monospace,
        FontId::new(14.0, FontFamily::Monospace),
    );

    ctx.set_style(style);
}

const ACCENT: Color32 = Color32::from_rgb(110, 220, 230);
const HEADER_TEXT: Color32 = Color32::from_rgb(170, 190, 200);
const WARNING_TEXT: Color32 = Color32::from_rgb(255, 190, 90);
const ERROR_TEXT: Color32 = Color32::from_rgb(255, 120, 120);

#[derive(Debug, Clone, Copy, PartialEq)]
enum SortBy {
    Name,
    Sales,
    Cost,
    Profit,
}

impl SortBy {
    fn label(&self) -> &'static str {
        match self {
            SortBy::Name => "Nombre",
            SortBy::Sales => "Venta neta",
            SortBy::Cost => "Costo",
            SortBy::Profit => "Ganancia",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum SortOrder {
    Ascending,
    Descending,
}

pub struct SalesApp {
    config: AppConfig,
    data_path: String,

    loaded: bool,
    records: Vec<ProductRecord>,
    load_error: Option<String>,

    // Filter state (owned here, passed by value into each recomputation)
    search: String,
    selected_categories: HashSet<String>,
    selected_brands: HashSet<String>,
    categories: Vec<String>,
    brands: Vec<String>,

    sort_by: SortBy,
    sort_order: SortOrder,
    top_metric: Metric,

    // Derived snapshots, rebuilt by recompute()
    filtered: Vec<ProductRecord>,
    totals: AggregateTotals,
    outlet_totals: Vec<OutletTotals>,
    warning: Option<ReconciliationWarning>,
    top_products: Vec<TopEntry>,

    // Purchase-order state
    selected_outlet: usize,
    days: u32,
    inventory_overrides: HashMap<String, f64>,
    order_lines: Vec<OrderLine>,
    order_error: Option<String>,
}

impl SalesApp {
    pub fn new() -> Self {
        let config = AppConfig::load(CONFIG_PATH);
        let data_path = config.data_file.clone();
        Self {
            config,
            data_path,

            loaded: false,
            records: vec![],
            load_error: None,

            search: "".into(),
            selected_categories: HashSet::new(),
            selected_brands: HashSet::new(),
            categories: vec![],
            brands: vec![],

            sort_by: SortBy::Sales,
            sort_order: SortOrder::Descending,
            top_metric: Metric::NetTotal,

            filtered: vec![],
            totals: AggregateTotals::zero(),
            outlet_totals: vec![],
            warning: None,
            top_products: vec![],

            selected_outlet: 0,
            days: 7,
            inventory_overrides: HashMap::new(),
            order_lines: vec![],
            order_error: None,
        }
    }

    fn load_data(&mut self) {
        match load_records(&self.data_path, &self.config.outlets) {
            Ok(records) => {
                self.categories = filter::distinct_categories(&records);
                self.brands = filter::distinct_brands(&records);
                self.records = records;
                self.load_error = None;
                self.inventory_overrides.clear();
                self.loaded = true;
                self.recompute();
            }
            Err(e) => {
                error!("load failed: {e}");
                self.load_error = Some(e.to_string());
            }
        }
    }

    // One synchronous pass: filter the records, rebuild every derived value.
    fn recompute(&mut self) {
        let mut criteria = FilterCriteria {
            categories: self.selected_categories.clone(),
            brands: self.selected_brands.clone(),
            names: HashSet::new(),
        };

        let search = self.search.trim().to_lowercase();
        let mut filtered = if search.is_empty() {
            filter::apply(&self.records, &criteria)
        } else {
            criteria.names = self
                .records
                .iter()
                .filter(|r| r.name.to_lowercase().contains(&search))
                .map(|r| r.name.clone())
                .collect();
            if criteria.names.is_empty() {
                vec![]
            } else {
                filter::apply(&self.records, &criteria)
            }
        };

        match self.sort_by {
            SortBy::Name => filtered.sort_by(|a, b| {
                if self.sort_order == SortOrder::Descending {
                    b.name.cmp(&a.name)
                } else {
                    a.name.cmp(&b.name)
                }
            }),
            SortBy::Sales => filtered.sort_by(|a, b| {
                let ord = a.net_total.partial_cmp(&b.net_total).unwrap_or(std::cmp::Ordering::Equal);
                if self.sort_order == SortOrder::Descending {
                    ord.reverse()
                } else {
                    ord
                }
            }),
            SortBy::Cost => filtered.sort_by(|a, b| {
                let ord = a.cost.partial_cmp(&b.cost).unwrap_or(std::cmp::Ordering::Equal);
                if self.sort_order == SortOrder::Descending {
                    ord.reverse()
                } else {
                    ord
                }
            }),
            SortBy::Profit => filtered.sort_by(|a, b| {
                let ord = a.profit.partial_cmp(&b.profit).unwrap_or(std::cmp::Ordering::Equal);
                if self.sort_order == SortOrder::Descending {
                    ord.reverse()
                } else {
                    ord
                }
            }),
        }

        self.totals = engine::compute_aggregate_totals(&filtered);
        self.outlet_totals =
            engine::compute_outlet_totals(&filtered, &self.config.outlets, self.config.allocation);
        self.warning = engine::reconcile(&self.outlet_totals, &self.totals);
        self.top_products = engine::compute_top_n(&filtered, self.top_metric, 5);
        self.filtered = filtered;

        self.refresh_order_lines();
    }

    fn refresh_order_lines(&mut self) {
        let Some(outlet) = self.config.outlets.get(self.selected_outlet).cloned() else {
            self.order_lines = vec![];
            self.order_error = None;
            return;
        };

        match compute_order_lines(&self.filtered, &outlet, self.days, &self.inventory_overrides) {
            Ok(lines) => {
                self.order_lines = lines;
                self.order_error = None;
            }
            Err(e) => {
                self.order_lines = vec![];
                self.order_error = Some(e.to_string());
            }
        }
    }

    fn order_export_text(&self) -> String {
        let outlet = self
            .config
            .outlets
            .get(self.selected_outlet)
            .map(String::as_str)
            .unwrap_or("?");
        let date = chrono::Local::now().format("%Y-%m-%d");

        let mut text = format!(
            "Orden de compra — {} — {} (proyección {} días)\n",
            outlet, date, self.days
        );
        for line in &self.order_lines {
            text.push_str(&format!(
                "{}: demanda {:.0}, inventario {:.0}, pedir {:.0}\n",
                line.name, line.projected_demand, line.inventory_on_hand, line.units_to_order
            ));
        }
        text
    }

    fn summary_card(ui: &mut egui::Ui, label: &str, value: String, color: Color32) {
        egui::Frame::new()
            .fill(Color32::from_rgb(26, 33, 38))
            .stroke(Stroke::new(1.0, Color32::from_rgb(55, 70, 80)))
            .inner_margin(Margin::same(12))
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.label(RichText::new(label).color(HEADER_TEXT).small());
                    ui.label(RichText::new(value).color(color).strong().size(20.0));
                });
            });
    }

    fn show_summary_cards(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            Self::summary_card(
                ui,
                "Venta total",
                format_money(self.totals.total_sales),
                ACCENT,
            );
            Self::summary_card(
                ui,
                "Costo total",
                format_money(self.totals.total_cost),
                Color32::from_rgb(255, 170, 120),
            );
            let profit_color = if self.totals.total_profit >= 0.0 {
                Color32::from_rgb(130, 230, 150)
            } else {
                ERROR_TEXT
            };
            Self::summary_card(
                ui,
                "Ganancia",
                format_money(self.totals.total_profit),
                profit_color,
            );
            Self::summary_card(
                ui,
                "Margen",
                format!("{:.2}%", self.totals.margin_percent),
                profit_color,
            );
        });
    }

    fn show_outlet_section(&self, ui: &mut egui::Ui) {
        ui.heading(RichText::new("Puntos de venta").color(ACCENT));

        if let Some(w) = &self.warning {
            ui.label(
                RichText::new(format!(
                    "⚠ Las ventas por punto ({}) no cuadran con el total ({}); diferencia {}",
                    format_money(w.outlet_sales_sum),
                    format_money(w.total_sales),
                    format_money(w.difference()),
                ))
                .color(WARNING_TEXT),
            );
        }

        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                TableBuilder::new(ui)
                    .id_salt("outlet_totals")
                    .striped(true)
                    .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                    .column(Column::exact(130.0))
                    .column(Column::exact(110.0))
                    .column(Column::exact(120.0))
                    .column(Column::exact(110.0))
                    .column(Column::exact(80.0))
                    .header(26.0, |mut header| {
                        for title in ["Punto", "Ventas", "Costo asignado", "Ganancia", "Margen"] {
                            header.col(|ui| {
                                ui.label(RichText::new(title).color(HEADER_TEXT).strong());
                            });
                        }
                    })
                    .body(|mut body| {
                        for t in &self.outlet_totals {
                            body.row(24.0, |mut row| {
                                row.col(|ui| {
                                    ui.label(&t.outlet);
                                });
                                row.col(|ui| {
                                    ui.label(format_money(t.sales));
                                });
                                row.col(|ui| {
                                    ui.label(format_money(t.allocated_cost));
                                });
                                row.col(|ui| {
                                    let color = if t.profit >= 0.0 {
                                        Color32::from_rgb(130, 230, 150)
                                    } else {
                                        ERROR_TEXT
                                    };
                                    ui.label(RichText::new(format_money(t.profit)).color(color));
                                });
                                row.col(|ui| {
                                    ui.label(format!("{:.1}%", t.margin_percent));
                                });
                            });
                        }
                    });
            });

            Plot::new("outlet_sales_chart")
                .legend(Legend::default())
                .height(180.0)
                .width(320.0)
                .allow_drag(false)
                .allow_zoom(false)
                .allow_scroll(false)
                .show(ui, |plot_ui| {
                    for (i, t) in self.outlet_totals.iter().enumerate() {
                        plot_ui.bar_chart(
                            BarChart::new(t.outlet.clone(), vec![Bar::new(i as f64, t.sales)])
                                .width(0.6),
                        );
                    }
                });
        });
    }

    fn show_top_section(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading(RichText::new("Top 5 productos").color(ACCENT));
            egui::ComboBox::from_id_salt("top_metric")
                .selected_text(self.top_metric.label())
                .show_ui(ui, |ui| {
                    for metric in [Metric::NetTotal, Metric::Cost, Metric::Profit] {
                        if ui
                            .selectable_value(&mut self.top_metric, metric, metric.label())
                            .clicked()
                        {
                            self.recompute();
                        }
                    }
                });
        });

        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                TableBuilder::new(ui)
                    .id_salt("top_products")
                    .striped(true)
                    .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                    .column(Column::remainder().at_least(180.0).clip(true))
                    .column(Column::exact(120.0))
                    .header(26.0, |mut header| {
                        header.col(|ui| {
                            ui.label(RichText::new("Producto").color(HEADER_TEXT).strong());
                        });
                        header.col(|ui| {
                            ui.label(
                                RichText::new(self.top_metric.label())
                                    .color(HEADER_TEXT)
                                    .strong(),
                            );
                        });
                    })
                    .body(|mut body| {
                        for entry in &self.top_products {
                            body.row(24.0, |mut row| {
                                row.col(|ui| {
                                    ui.label(&entry.name);
                                });
                                row.col(|ui| {
                                    ui.label(format_money(entry.value));
                                });
                            });
                        }
                    });
            });

            Plot::new("top_products_chart")
                .legend(Legend::default())
                .height(180.0)
                .width(320.0)
                .allow_drag(false)
                .allow_zoom(false)
                .allow_scroll(false)
                .show(ui, |plot_ui| {
                    for (i, entry) in self.top_products.iter().enumerate() {
                        plot_ui.bar_chart(
                            BarChart::new(entry.name.clone(), vec![Bar::new(i as f64, entry.value)])
                                .width(0.6),
                        );
                    }
                });
        });
    }

    fn show_products_table(&self, ui: &mut egui::Ui) {
        ui.heading(RichText::new("Productos").color(ACCENT));

        TableBuilder::new(ui)
            .id_salt("products")
            .striped(true)
            .vscroll(true)
            .max_scroll_height(260.0)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::remainder().at_least(180.0).clip(true))
            .column(Column::exact(120.0))
            .column(Column::exact(110.0))
            .column(Column::exact(110.0))
            .column(Column::exact(110.0))
            .column(Column::exact(110.0))
            .header(26.0, |mut header| {
                for title in ["Nombre", "Categoría", "Marca", "Venta neta", "Costo", "Ganancia"] {
                    header.col(|ui| {
                        ui.label(RichText::new(title).color(HEADER_TEXT).strong());
                    });
                }
            })
            .body(|body| {
                body.rows(24.0, self.filtered.len(), |mut row| {
                    let r = &self.filtered[row.index()];
                    row.col(|ui| {
                        ui.label(&r.name);
                    });
                    row.col(|ui| {
                        ui.label(r.category.as_deref().unwrap_or("—"));
                    });
                    row.col(|ui| {
                        ui.label(r.brand.as_deref().unwrap_or("—"));
                    });
                    row.col(|ui| {
                        ui.label(format_money(r.net_total));
                    });
                    row.col(|ui| {
                        ui.label(format_money(r.cost));
                    });
                    row.col(|ui| {
                        let color = if r.profit >= 0.0 {
                            Color32::from_rgb(130, 230, 150)
                        } else {
                            ERROR_TEXT
                        };
                        ui.label(RichText::new(format_money(r.profit)).color(color));
                    });
                });
            });
    }

    fn show_order_section(&mut self, ui: &mut egui::Ui) {
        ui.heading(RichText::new("Orden de compra").color(ACCENT));

        ui.horizontal(|ui| {
            ui.label(RichText::new("Punto de venta:").color(HEADER_TEXT));
            let selected_name = self
                .config
                .outlets
                .get(self.selected_outlet)
                .cloned()
                .unwrap_or_default();
            egui::ComboBox::from_id_salt("order_outlet")
                .selected_text(selected_name)
                .show_ui(ui, |ui| {
                    for i in 0..self.config.outlets.len() {
                        let name = self.config.outlets[i].clone();
                        if ui
                            .selectable_value(&mut self.selected_outlet, i, name)
                            .clicked()
                        {
                            self.refresh_order_lines();
                        }
                    }
                });

            ui.separator();

            ui.label(RichText::new("Días a proyectar:").color(HEADER_TEXT));
            if ui
                .add(egui::Slider::new(&mut self.days, 1..=30).suffix(" días"))
                .changed()
            {
                self.refresh_order_lines();
            }

            ui.separator();

            if !self.inventory_overrides.is_empty()
                && ui.button("Restaurar inventario").clicked()
            {
                self.inventory_overrides.clear();
                self.refresh_order_lines();
            }

            if !self.order_lines.is_empty() && ui.button("📋 Copiar orden").clicked() {
                ui.ctx().copy_text(self.order_export_text());
            }
        });

        if let Some(err) = &self.order_error {
            ui.label(RichText::new(format!("⚠ {err}")).color(WARNING_TEXT));
            return;
        }

        let mut edits: Vec<(String, f64)> = vec![];

        TableBuilder::new(ui)
            .id_salt("order_lines")
            .striped(true)
            .vscroll(true)
            .max_scroll_height(260.0)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::remainder().at_least(180.0).clip(true))
            .column(Column::exact(150.0))
            .column(Column::exact(130.0))
            .column(Column::exact(130.0))
            .header(26.0, |mut header| {
                for title in [
                    "Producto",
                    "Demanda proyectada",
                    "Inventario",
                    "Unidades a pedir",
                ] {
                    header.col(|ui| {
                        ui.label(RichText::new(title).color(HEADER_TEXT).strong());
                    });
                }
            })
            .body(|body| {
                body.rows(24.0, self.order_lines.len(), |mut row| {
                    let line = &self.order_lines[row.index()];
                    row.col(|ui| {
                        ui.label(&line.name);
                    });
                    row.col(|ui| {
                        ui.label(format!("{:.0}", line.projected_demand));
                    });
                    row.col(|ui| {
                        // Manual stock correction; feeds the override map,
                        // the loaded records are never touched.
                        let mut on_hand = line.inventory_on_hand;
                        if ui
                            .add(egui::DragValue::new(&mut on_hand).speed(1.0).range(0.0..=1_000_000.0))
                            .changed()
                        {
                            edits.push((line.name.clone(), on_hand));
                        }
                    });
                    row.col(|ui| {
                        let color = if line.units_to_order > 0.0 {
                            ACCENT
                        } else {
                            Color32::from_rgb(120, 140, 150)
                        };
                        ui.label(
                            RichText::new(format!("{:.0}", line.units_to_order))
                                .color(color)
                                .strong(),
                        );
                    });
                });
            });

        if !edits.is_empty() {
            for (name, on_hand) in edits {
                self.inventory_overrides.insert(name, on_hand);
            }
            self.refresh_order_lines();
        }
    }

    fn show_filter_panel(&mut self, ctx: &Context) {
        egui::SidePanel::right("filters")
            .min_width(230.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                ui.heading(RichText::new("Filtros").color(ACCENT));
                ui.separator();

                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.label(RichText::new("Categorías").strong());
                    let categories = self.categories.clone();
                    for category in &categories {
                        let mut checked = self.selected_categories.contains(category);
                        if ui.checkbox(&mut checked, category).changed() {
                            if checked {
                                self.selected_categories.insert(category.clone());
                            } else {
                                self.selected_categories.remove(category);
                            }
                            self.recompute();
                        }
                    }

                    ui.add_space(10.0);
                    ui.separator();

                    ui.label(RichText::new("Marcas").strong());
                    let brands = self.brands.clone();
                    for brand in &brands {
                        let mut checked = self.selected_brands.contains(brand);
                        if ui.checkbox(&mut checked, brand).changed() {
                            if checked {
                                self.selected_brands.insert(brand.clone());
                            } else {
                                self.selected_brands.remove(brand);
                            }
                            self.recompute();
                        }
                    }

                    ui.add_space(10.0);
                    ui.separator();

                    ui.label(RichText::new("Reparto de costos").strong());
                    egui::ComboBox::from_id_salt("allocation")
                        .selected_text(self.config.allocation.label())
                        .show_ui(ui, |ui| {
                            for strategy in [
                                AllocationStrategy::RevenueShare,
                                AllocationStrategy::PerUnitCost,
                            ] {
                                if ui
                                    .selectable_value(
                                        &mut self.config.allocation,
                                        strategy,
                                        strategy.label(),
                                    )
                                    .clicked()
                                {
                                    self.recompute();
                                }
                            }
                        });

                    ui.add_space(10.0);
                    ui.separator();

                    ui.label(RichText::new("Ordenar por").strong());
                    egui::ComboBox::from_id_salt("sort_by")
                        .selected_text(self.sort_by.label())
                        .show_ui(ui, |ui| {
                            for sort in [SortBy::Name, SortBy::Sales, SortBy::Cost, SortBy::Profit]
                            {
                                if ui
                                    .selectable_value(&mut self.sort_by, sort, sort.label())
                                    .clicked()
                                {
                                    self.recompute();
                                }
                            }
                        });

                    ui.horizontal(|ui| {
                        if ui
                            .selectable_value(&mut self.sort_order, SortOrder::Descending, "⬇ Desc")
                            .clicked()
                        {
                            self.recompute();
                        }
                        if ui
                            .selectable_value(&mut self.sort_order, SortOrder::Ascending, "⬆ Asc")
                            .clicked()
                        {
                            self.recompute();
                        }
                    });

                    ui.add_space(10.0);
                    ui.separator();

                    if ui
                        .button(RichText::new("🔄 Limpiar filtros").color(ERROR_TEXT))
                        .clicked()
                    {
                        self.search.clear();
                        self.selected_categories.clear();
                        self.selected_brands.clear();
                        self.sort_by = SortBy::Sales;
                        self.sort_order = SortOrder::Descending;
                        self.recompute();
                    }
                });
            });
    }
}

impl eframe::App for SalesApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.add_space(4.0);

            ui.horizontal(|ui| {
                ui.heading(
                    RichText::new("📊 Panel de Ventas e Inventario")
                        .color(ACCENT)
                        .strong()
                        .size(24.0),
                );
            });

            ui.add_space(4.0);
            ui.separator();
            ui.add_space(4.0);

            ui.horizontal(|ui| {
                if ui
                    .add_sized(
                        Vec2::new(120.0, 32.0),
                        egui::Button::new(RichText::new("📂 Cargar datos").color(ACCENT).strong()),
                    )
                    .clicked()
                {
                    self.load_data();
                }

                ui.add(
                    egui::TextEdit::singleline(&mut self.data_path)
                        .hint_text("ventas.xlsx")
                        .desired_width(240.0),
                );

                ui.separator();

                ui.label(RichText::new("🔎").color(HEADER_TEXT));
                let search_response = ui.add(
                    egui::TextEdit::singleline(&mut self.search)
                        .hint_text("Buscar por nombre...")
                        .desired_width(200.0),
                );
                if search_response.changed() && self.loaded {
                    self.recompute();
                }
            });

            ui.add_space(2.0);
        });

        if self.loaded {
            self.show_filter_panel(ctx);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(err) = &self.load_error {
                ui.label(RichText::new(format!("⚠ {err}")).color(ERROR_TEXT));
                ui.add_space(6.0);
            }

            if !self.loaded {
                ui.centered_and_justified(|ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(100.0);
                        ui.label(RichText::new("📊").size(80.0).color(ACCENT));
                        ui.add_space(20.0);
                        ui.label(
                            RichText::new("Panel de ventas e inventario")
                                .size(24.0)
                                .color(HEADER_TEXT),
                        );
                        ui.add_space(10.0);
                        ui.label(
                            RichText::new("Cargue la hoja de ventas para comenzar")
                                .color(Color32::from_rgb(120, 140, 150)),
                        );
                    });
                });
                return;
            }

            egui::ScrollArea::vertical().show(ui, |ui| {
                self.show_summary_cards(ui);

                ui.add_space(10.0);
                ui.separator();
                self.show_outlet_section(ui);

                ui.add_space(10.0);
                ui.separator();
                self.show_top_section(ui);

                ui.add_space(10.0);
                ui.separator();
                self.show_products_table(ui);

                ui.add_space(10.0);
                ui.separator();
                self.show_order_section(ui);
            });
        });
    }
}

fn format_money(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as i64;
    let negative = value < 0.0 && cents > 0;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("{}${}.{:02}", if negative { "-" } else { "" }, grouped, frac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_formatting_groups_thousands() {
        assert_eq!(format_money(0.0), "$0.00");
        assert_eq!(format_money(1250.5), "$1,250.50");
        assert_eq!(format_money(1_234_567.891), "$1,234,567.89");
        assert_eq!(format_money(-42.0), "-$42.00");
    }
}
