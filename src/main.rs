use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints, Points};
use nalgebra as na;
use vortex_panel::{
    concatenate, make_circle, make_ellipse, make_jukowski, make_polygon, FlowConfig, Formulation,
    LaminarMarch, PanelArray,
};

#[derive(Debug, Clone, Copy, PartialEq)]
enum GeometryChoice {
    Circle,
    Ellipse,
    Jukowski,
    Polygon,
    TwoCylinders,
}

impl GeometryChoice {
    fn label(&self) -> &'static str {
        match self {
            GeometryChoice::Circle => "Circle",
            GeometryChoice::Ellipse => "Ellipse",
            GeometryChoice::Jukowski => "Jukowski foil",
            GeometryChoice::Polygon => "Triangle",
            GeometryChoice::TwoCylinders => "Two cylinders",
        }
    }

    fn build(&self, num_panels: usize) -> vortex_panel::Result<PanelArray> {
        match self {
            GeometryChoice::Circle => make_circle(num_panels, 0.0, 0.0),
            GeometryChoice::Ellipse => make_ellipse(num_panels, 0.5, 0.0, 0.0),
            GeometryChoice::Jukowski => make_jukowski(num_panels, 0.18, 0.0, 0.0),
            GeometryChoice::Polygon => make_polygon(num_panels, 3),
            GeometryChoice::TwoCylinders => {
                let a = make_circle(num_panels / 2, -1.2, 0.0)?;
                let b = make_circle(num_panels / 2, 1.2, 0.0)?;
                concatenate(&[&a, &b])
            }
        }
    }

    // trailing-edge panels (constant) or node (linear); only the foil has one
    fn kutta(&self) -> Vec<(isize, isize)> {
        match self {
            GeometryChoice::Jukowski => vec![(0, -1)],
            _ => Vec::new(),
        }
    }
}

#[derive(Debug)]
struct StreamlineData {
    points: Vec<[f64; 2]>,
    velocities: Vec<f64>,
}

impl StreamlineData {
    fn new() -> Self {
        Self {
            points: Vec::new(),
            velocities: Vec::new(),
        }
    }
}

#[derive(Debug)]
struct VelocityFieldSettings {
    show_field: bool,
    grid_density: usize,
    scale_factor: f64,
    min_velocity: f64,
    max_velocity: f64,
}

struct FlowViewer {
    geometry: GeometryChoice,
    num_panels: usize,
    angle_of_attack: f64,
    formulation: Formulation,
    use_kutta: bool,
    thwaites: bool,
    array: Option<PanelArray>,
    show_panels: bool,
    show_streamlines: bool,
    streamlines: Vec<StreamlineData>,
    min_velocity: f64,
    max_velocity: f64,
    separation_points: Vec<na::Point2<f64>>,
    surface_speed: Vec<[f64; 2]>,
    velocity_field_settings: VelocityFieldSettings,
    field_points: Option<Vec<na::Point2<f64>>>,
    field_velocities: Option<Vec<na::Vector2<f64>>>,
    status: Option<String>,
}

impl FlowViewer {
    fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let mut viewer = Self {
            geometry: GeometryChoice::Jukowski,
            num_panels: 64,
            angle_of_attack: 5.0,
            formulation: Formulation::Constant,
            use_kutta: true,
            thwaites: false,
            array: None,
            show_panels: true,
            show_streamlines: true,
            streamlines: Vec::new(),
            min_velocity: f64::INFINITY,
            max_velocity: -f64::INFINITY,
            separation_points: Vec::new(),
            surface_speed: Vec::new(),
            velocity_field_settings: VelocityFieldSettings {
                show_field: false,
                grid_density: 20,
                scale_factor: 0.1,
                min_velocity: f64::INFINITY,
                max_velocity: -f64::INFINITY,
            },
            field_points: None,
            field_velocities: None,
            status: None,
        };
        viewer.run_simulation();
        viewer
    }

    fn config(&self) -> FlowConfig {
        FlowConfig {
            alpha: self.angle_of_attack.to_radians().into(),
            formulation: self.formulation,
            kutta: if self.use_kutta { self.geometry.kutta() } else { Vec::new() },
            thwaites: self.thwaites,
            ..FlowConfig::default()
        }
    }

    fn run_simulation(&mut self) {
        let config = self.config();
        let solved = self.geometry.build(self.num_panels).and_then(|mut array| {
            array.solve(&config)?;
            Ok(array)
        });

        match solved {
            Ok(array) => {
                log::info!(
                    "{} with {} panels solved at alpha = {:.1} deg",
                    self.geometry.label(),
                    array.len(),
                    self.angle_of_attack
                );
                self.array = Some(array);
                self.status = None;
                self.calculate_streamlines();
                self.calculate_velocity_field();
                self.calculate_boundary_layers();
            }
            Err(err) => {
                log::warn!("solve failed: {}", err);
                self.array = None;
                self.status = Some(err.to_string());
            }
        }
    }

    fn calculate_boundary_layers(&mut self) {
        self.separation_points.clear();
        self.surface_speed.clear();
        let config = self.config();
        let Some(array) = &self.array else { return };

        self.surface_speed = array
            .distance()
            .into_iter()
            .zip(array.gammas())
            .map(|(s, g)| [s, g.abs()])
            .collect();

        // split each body separately so runs start at its own stagnation point
        for body in array.bodies() {
            let panels = array.panels()[body.clone()].to_vec();
            let single = PanelArray::new(panels);
            let (top, bottom) = single.split();
            for run in [top, bottom] {
                if run.len() < 2 {
                    continue;
                }
                match run.march_with(&LaminarMarch, &config) {
                    Ok(profile) => self
                        .separation_points
                        .push(run.separation_location(&LaminarMarch, profile.i_sep)),
                    Err(err) => log::debug!("no separation point: {}", err),
                }
            }
        }
    }

    fn velocity_at(&self, point: &na::Point2<f64>) -> na::Vector2<f64> {
        match &self.array {
            Some(array) => array.flow_velocity(std::slice::from_ref(point))[0],
            None => na::Vector2::new(1.0, 0.0),
        }
    }

    fn calculate_streamline(&self, start_point: na::Point2<f64>) -> StreamlineData {
        let mut streamline_data = StreamlineData::new();
        let mut current_point = start_point;
        streamline_data.points.push([current_point.x, current_point.y]);

        let dt = 0.02;
        let steps = 300;

        for _ in 0..steps {
            let velocity = self.velocity_at(&current_point);
            let speed = velocity.norm();

            streamline_data.velocities.push(speed);

            if speed < 1e-10 {
                break;
            }

            // RK4 step
            let k1 = velocity;
            let k2 = self.velocity_at(&(current_point + k1 * dt / 2.0));
            let k3 = self.velocity_at(&(current_point + k2 * dt / 2.0));
            let k4 = self.velocity_at(&(current_point + k3 * dt));

            current_point += (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0);
            streamline_data.points.push([current_point.x, current_point.y]);

            if current_point.x < -3.0 || current_point.x > 3.0 || current_point.y.abs() > 2.0 {
                break;
            }
        }

        streamline_data
    }

    fn calculate_streamlines(&mut self) {
        self.min_velocity = f64::INFINITY;
        self.max_velocity = -f64::INFINITY;

        let streamlines: Vec<StreamlineData> = (-10..=10)
            .map(|i| self.calculate_streamline(na::Point2::new(-2.5, i as f64 * 0.15)))
            .collect();

        for streamline_data in &streamlines {
            for &v in &streamline_data.velocities {
                self.min_velocity = self.min_velocity.min(v);
                self.max_velocity = self.max_velocity.max(v);
            }
        }
        self.streamlines = streamlines;
    }

    fn is_point_near_body(&self, point: &na::Point2<f64>) -> bool {
        let Some(array) = &self.array else { return false };
        array.panels().iter().any(|panel| (point - panel.center()).norm_squared() < 0.01)
    }

    fn calculate_velocity_field(&mut self) {
        let density = self.velocity_field_settings.grid_density;
        let (x_min, x_max, y_min, y_max) = (-2.5, 2.5, -1.5, 1.5);
        let dx = (x_max - x_min) / density as f64;
        let dy = (y_max - y_min) / density as f64;

        let mut field_points = Vec::new();
        for i in 0..=density {
            for j in 0..=density {
                let point = na::Point2::new(x_min + dx * i as f64, y_min + dy * j as f64);
                // skip points inside or very close to the body
                if !self.is_point_near_body(&point) {
                    field_points.push(point);
                }
            }
        }

        let field_velocities = match &self.array {
            Some(array) => array.flow_velocity(&field_points),
            None => Vec::new(),
        };

        let settings = &mut self.velocity_field_settings;
        settings.min_velocity = f64::INFINITY;
        settings.max_velocity = -f64::INFINITY;
        for v in &field_velocities {
            settings.min_velocity = settings.min_velocity.min(v.norm());
            settings.max_velocity = settings.max_velocity.max(v.norm());
        }

        self.field_points = Some(field_points);
        self.field_velocities = Some(field_velocities);
    }

    fn velocity_to_color(&self, velocity: f64, min: f64, max: f64) -> egui::Color32 {
        let t = ((velocity - min) / (max - min)).clamp(0.0, 1.0);

        // blue (slow) to red (fast), green peaking in the middle
        let r = (t * 255.0) as u8;
        let b = ((1.0 - t) * 255.0) as u8;
        let g = (((1.0 - t) * t * 4.0) * 255.0) as u8;

        egui::Color32::from_rgb(r, g, b)
    }

    fn draw_bodies(&self, plot_ui: &mut egui_plot::PlotUi) {
        let Some(array) = &self.array else { return };
        for body in array.bodies() {
            let panels = &array.panels()[body.clone()];
            let mut points: Vec<[f64; 2]> =
                panels.iter().map(|p| [p.start().x, p.start().y]).collect();
            if let Some(last) = panels.last() {
                points.push([last.end().x, last.end().y]);
            }
            plot_ui.line(
                Line::new(PlotPoints::new(points))
                    .color(egui::Color32::DARK_RED)
                    .width(2.0),
            );
        }

        if self.show_panels {
            // panel strength drawn along the normal
            for panel in array.panels() {
                let c = panel.center();
                let n = panel.normal() * panel.gamma() * 0.1;
                plot_ui.line(
                    Line::new(vec![[c.x, c.y], [c.x + n.x, c.y + n.y]])
                        .color(egui::Color32::RED)
                        .width(1.0),
                );
            }
        }

        if !self.separation_points.is_empty() {
            let points: Vec<[f64; 2]> = self.separation_points.iter().map(|p| [p.x, p.y]).collect();
            plot_ui.points(
                Points::new(points)
                    .radius(4.0)
                    .color(egui::Color32::GOLD)
                    .name("Separation"),
            );
        }
    }

    fn draw_streamlines(&self, plot_ui: &mut egui_plot::PlotUi) {
        for streamline in &self.streamlines {
            for i in 1..streamline.points.len() {
                let color = self.velocity_to_color(
                    streamline.velocities[i - 1],
                    self.min_velocity,
                    self.max_velocity,
                );
                plot_ui.line(
                    Line::new(vec![streamline.points[i - 1], streamline.points[i]])
                        .color(color)
                        .width(1.5),
                );
            }
        }
    }

    fn draw_velocity_field(&self, plot_ui: &mut egui_plot::PlotUi) {
        if let (Some(points), Some(velocities)) = (&self.field_points, &self.field_velocities) {
            let settings = &self.velocity_field_settings;

            for (point, velocity) in points.iter().zip(velocities.iter()) {
                let color = self.velocity_to_color(
                    velocity.norm(),
                    settings.min_velocity,
                    settings.max_velocity,
                );

                let scaled_dx = velocity.x * settings.scale_factor / settings.max_velocity;
                let scaled_dy = velocity.y * settings.scale_factor / settings.max_velocity;
                let tip = [point.x + scaled_dx, point.y + scaled_dy];

                plot_ui.line(Line::new(vec![[point.x, point.y], tip]).color(color).width(1.0));

                let head_size = 0.02;
                let angle = f64::atan2(scaled_dy, scaled_dx);
                let head_angle = 0.5;
                let arrow_head = Line::new(vec![
                    tip,
                    [
                        tip[0] - head_size * f64::cos(angle + head_angle),
                        tip[1] - head_size * f64::sin(angle + head_angle),
                    ],
                    [
                        tip[0] - head_size * f64::cos(angle - head_angle),
                        tip[1] - head_size * f64::sin(angle - head_angle),
                    ],
                    tip,
                ])
                .color(color)
                .width(1.0);

                plot_ui.line(arrow_head);
            }
        }
    }
}

impl eframe::App for FlowViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::SidePanel::left("controls").show(ctx, |ui| {
            ui.heading("Vortex Panels");

            egui::ComboBox::from_label("Geometry")
                .selected_text(self.geometry.label())
                .show_ui(ui, |ui| {
                    for choice in [
                        GeometryChoice::Circle,
                        GeometryChoice::Ellipse,
                        GeometryChoice::Jukowski,
                        GeometryChoice::Polygon,
                        GeometryChoice::TwoCylinders,
                    ] {
                        ui.selectable_value(&mut self.geometry, choice, choice.label());
                    }
                });

            ui.add(egui::Slider::new(&mut self.num_panels, 8..=256).text("Panels"));
            ui.add(
                egui::Slider::new(&mut self.angle_of_attack, -10.0..=10.0)
                    .text("Angle of Attack (°)"),
            );

            ui.horizontal(|ui| {
                ui.radio_value(&mut self.formulation, Formulation::Constant, "Constant");
                ui.radio_value(&mut self.formulation, Formulation::Linear, "Linear");
            });

            ui.checkbox(&mut self.use_kutta, "Kutta Condition");
            ui.checkbox(&mut self.thwaites, "Thwaites Boundary Layer");
            ui.checkbox(&mut self.show_panels, "Show Panel Strength");
            ui.checkbox(&mut self.show_streamlines, "Show Streamlines");

            if ui.button("Run Simulation").clicked() {
                self.run_simulation();
            }

            if let Some(status) = &self.status {
                ui.colored_label(egui::Color32::RED, status);
            }

            ui.separator();
            ui.heading("Velocity Field");
            ui.checkbox(&mut self.velocity_field_settings.show_field, "Show Velocity Vectors");
            if self.velocity_field_settings.show_field {
                let settings = &mut self.velocity_field_settings;
                ui.add(egui::Slider::new(&mut settings.grid_density, 10..=40).text("Grid Density"));
                ui.add(
                    egui::Slider::new(&mut settings.scale_factor, 0.05..=0.3).text("Vector Scale"),
                );
            }

            ui.separator();
            ui.label(format!("Max speed: {:.2}", self.max_velocity));
            ui.label(format!("Min speed: {:.2}", self.min_velocity));
        });

        egui::TopBottomPanel::bottom("surface_speed")
            .resizable(true)
            .show(ctx, |ui| {
                ui.label("Surface speed |γ| along the panels");
                Plot::new("surface_speed_plot").height(180.0).show(ui, |plot_ui| {
                    plot_ui.line(
                        Line::new(PlotPoints::new(self.surface_speed.clone()))
                            .color(egui::Color32::LIGHT_BLUE)
                            .name("|γ|"),
                    );
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            let plot = Plot::new("flow_plot")
                .view_aspect(1.0)
                .data_aspect(1.0)
                .include_x(-2.5)
                .include_x(2.5)
                .include_y(-1.5)
                .include_y(1.5);

            plot.show(ui, |plot_ui| {
                if self.show_streamlines {
                    self.draw_streamlines(plot_ui);
                }
                if self.velocity_field_settings.show_field {
                    self.draw_velocity_field(plot_ui);
                }
                self.draw_bodies(plot_ui);
            });
        });
    }
}

fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Vortex Panel Flow",
        options,
        Box::new(|cc| Box::new(FlowViewer::new(cc))),
    )
}
