fn main() {
    if let Err(err) = native::run() {
        eprintln!("polygon_cli error: {err}");
        std::process::exit(1);
    }
}

mod native {
    use citygml_polygon::appearance::{Texture, TextureCoordinates, TextureTargetDefinition};
    use citygml_polygon::geom::{
        BuildContext, BuildOptions, LinearRing, Point3, Polygon, PolygonDiagnostics, PolygonMesh,
        TexCoord,
    };
    use citygml_polygon::logger::{CityGmlLogger, LogLevel, RecordingLogger};
    use serde::Serialize;
    use std::fs::{self, File};
    use std::io::{BufWriter, Write};
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    const TEXTURE_THEME: &str = "rgbTexture";

    const USAGE: &str = r"polygon_cli (citygml-polygon)

USAGE:
  polygon_cli list
  polygon_cli run <scenario|all> [options]

SCENARIOS:
  unit_square
  square_with_hole
  concave_l
  textured_square

OPTIONS (run):
  --out-dir <dir>    Write <scenario>.obj and <scenario>.json to this dir (required for `all`)
  --obj <path>       Write OBJ (single scenario only)
  --json <path>      Write mesh and diagnostics as JSON (single scenario only)
  --no-tesselate     Use the fan instead of the tesselator
  --no-optimize      Keep duplicate ring vertices
  --overwrite        Overwrite existing output files
  -h, --help         Show this help
";

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let Some(command) = args.next() else {
            print_usage();
            return Ok(());
        };

        match command.as_str() {
            "list" => {
                print_scenarios();
                Ok(())
            }
            "run" => cmd_run(&mut args),
            "-h" | "--help" | "help" => {
                print_usage();
                Ok(())
            }
            other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
        }
    }

    fn print_usage() {
        println!("{USAGE}");
    }

    fn print_scenarios() {
        for scenario in Scenario::ALL {
            println!("{}", scenario.name());
        }
    }

    fn cmd_run(args: &mut Args) -> Result<(), String> {
        let scenario_name = args.next().ok_or("missing scenario name")?;

        let mut out_dir: Option<PathBuf> = None;
        let mut obj_path: Option<PathBuf> = None;
        let mut json_path: Option<PathBuf> = None;
        let mut overwrite = false;
        let mut options = BuildOptions::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--out-dir" => out_dir = Some(PathBuf::from(args.value("--out-dir")?)),
                "--obj" => obj_path = Some(PathBuf::from(args.value("--obj")?)),
                "--json" => json_path = Some(PathBuf::from(args.value("--json")?)),
                "--overwrite" => overwrite = true,
                "--no-tesselate" => options.tesselate = false,
                "--no-optimize" => options.optimize = false,
                "-h" | "--help" => {
                    print_usage();
                    return Ok(());
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        if let Some(dir) = out_dir.as_ref() {
            if obj_path.is_some() || json_path.is_some() {
                return Err("use either --out-dir or --obj/--json (not both)".to_string());
            }
            fs::create_dir_all(dir).map_err(|e| format!("create out dir: {e}"))?;

            let scenarios: Vec<Scenario> = if scenario_name == "all" {
                Scenario::ALL.to_vec()
            } else {
                vec![Scenario::from_str(&scenario_name).ok_or_else(|| unknown_scenario(&scenario_name))?]
            };
            for scenario in scenarios {
                let output = run_scenario(scenario, options)?;
                write_obj_file(&dir.join(format!("{}.obj", output.name)), &output, overwrite)?;
                write_json_file(&dir.join(format!("{}.json", output.name)), &output, overwrite)?;
                report(&output);
            }
            return Ok(());
        }

        if scenario_name == "all" {
            return Err("`run all` requires --out-dir".to_string());
        }

        let scenario =
            Scenario::from_str(&scenario_name).ok_or_else(|| unknown_scenario(&scenario_name))?;
        let output = run_scenario(scenario, options)?;

        if let Some(path) = obj_path.as_deref() {
            write_obj_file(path, &output, overwrite)?;
        }
        if let Some(path) = json_path.as_deref() {
            write_json_file(path, &output, overwrite)?;
        }
        if obj_path.is_none() && json_path.is_none() {
            print!("{}", output.diagnostics);
        }
        report(&output);

        Ok(())
    }

    fn report(output: &ScenarioOutput) {
        for record in &output.log {
            eprintln!("[{}] {}", record.0, record.1);
        }
        eprintln!(
            "{}: vertices={} triangles={} | {}",
            output.name,
            output.mesh.vertex_count(),
            output.mesh.triangle_count(),
            output.diagnostics.summary()
        );
    }

    fn unknown_scenario(name: &str) -> String {
        let mut msg = format!("unknown scenario `{name}`\n\navailable scenarios:\n");
        for scenario in Scenario::ALL {
            msg.push_str("  ");
            msg.push_str(scenario.name());
            msg.push('\n');
        }
        msg
    }

    fn create_output(path: &Path, overwrite: bool) -> Result<BufWriter<File>, String> {
        if path.exists() && !overwrite {
            return Err(format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| format!("create dir {}: {e}", parent.display()))?;
        }
        let file = File::create(path).map_err(|e| format!("create {}: {e}", path.display()))?;
        Ok(BufWriter::new(file))
    }

    fn write_json_file(path: &Path, output: &ScenarioOutput, overwrite: bool) -> Result<(), String> {
        #[derive(Serialize)]
        struct JsonOutput<'a> {
            name: &'a str,
            mesh: &'a PolygonMesh,
            diagnostics: &'a PolygonDiagnostics,
        }

        let mut w = create_output(path, overwrite)?;
        let json = JsonOutput {
            name: output.name,
            mesh: &output.mesh,
            diagnostics: &output.diagnostics,
        };
        serde_json::to_writer_pretty(&mut w, &json).map_err(|e| format!("write json: {e}"))?;
        writeln!(w).map_err(|e| format!("write json: {e}"))?;
        w.flush().map_err(|e| format!("flush {}: {e}", path.display()))?;
        eprintln!("wrote {}", path.display());
        Ok(())
    }

    fn write_obj_file(path: &Path, output: &ScenarioOutput, overwrite: bool) -> Result<(), String> {
        let mesh = &output.mesh;
        mesh.validate().map_err(|e| format!("mesh validation failed: {e}"))?;

        let mut w = create_output(path, overwrite)?;
        let io = |e: std::io::Error| format!("write obj: {e}");

        writeln!(w, "# citygml-polygon polygon_cli").map_err(io)?;
        writeln!(w, "o {}", output.name).map_err(io)?;

        for p in mesh.positions.iter().copied() {
            writeln!(w, "v {} {} {}", p[0], p[1], p[2]).map_err(io)?;
        }
        if let Some(uvs) = mesh.uvs.as_ref() {
            for uv in uvs.iter().copied() {
                writeln!(w, "vt {} {}", uv[0], uv[1]).map_err(io)?;
            }
        }
        if let Some(normals) = mesh.normals.as_ref() {
            for n in normals.iter().copied() {
                writeln!(w, "vn {} {} {}", n[0], n[1], n[2]).map_err(io)?;
            }
        }

        let has_uvs = mesh.uvs.is_some();
        let has_normals = mesh.normals.is_some();

        for tri in mesh.indices.chunks_exact(3) {
            let a = tri[0] + 1;
            let b = tri[1] + 1;
            let c = tri[2] + 1;

            match (has_uvs, has_normals) {
                (true, true) => writeln!(w, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}"),
                (true, false) => writeln!(w, "f {a}/{a} {b}/{b} {c}/{c}"),
                (false, true) => writeln!(w, "f {a}//{a} {b}//{b} {c}//{c}"),
                (false, false) => writeln!(w, "f {a} {b} {c}"),
            }
            .map_err(io)?;
        }

        w.flush().map_err(|e| format!("flush {}: {e}", path.display()))?;
        eprintln!("wrote {}", path.display());
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Scenarios
    // ─────────────────────────────────────────────────────────────────────────

    #[derive(Debug, Clone, Copy)]
    enum Scenario {
        UnitSquare,
        SquareWithHole,
        ConcaveL,
        TexturedSquare,
    }

    impl Scenario {
        const ALL: &'static [Scenario] = &[
            Scenario::UnitSquare,
            Scenario::SquareWithHole,
            Scenario::ConcaveL,
            Scenario::TexturedSquare,
        ];

        fn name(self) -> &'static str {
            match self {
                Scenario::UnitSquare => "unit_square",
                Scenario::SquareWithHole => "square_with_hole",
                Scenario::ConcaveL => "concave_l",
                Scenario::TexturedSquare => "textured_square",
            }
        }

        fn from_str(name: &str) -> Option<Self> {
            Self::ALL.iter().copied().find(|scenario| scenario.name() == name)
        }
    }

    struct ScenarioOutput {
        name: &'static str,
        mesh: PolygonMesh,
        diagnostics: PolygonDiagnostics,
        log: Vec<(LogLevel, String)>,
    }

    fn ring(id: &str, is_exterior: bool, points: &[[f64; 3]]) -> LinearRing {
        LinearRing::with_vertices(id, is_exterior, points.iter().copied().map(Point3::from_array).collect())
    }

    fn square(id: &str, is_exterior: bool, min: f64, size: f64) -> LinearRing {
        let max = min + size;
        ring(
            id,
            is_exterior,
            &[[min, min, 0.0], [max, min, 0.0], [max, max, 0.0], [min, max, 0.0]],
        )
    }

    fn build_polygon(scenario: Scenario, logger: &Arc<dyn CityGmlLogger>) -> Result<(Polygon, Option<&'static str>), String> {
        let mut polygon = Polygon::new(scenario.name(), Some(Arc::clone(logger)));
        let mut theme = None;
        match scenario {
            Scenario::UnitSquare => {
                polygon.add_ring(square("outer", true, 0.0, 1.0)).map_err(|e| e.to_string())?;
            }
            Scenario::SquareWithHole => {
                polygon.add_ring(square("outer", true, 0.0, 4.0)).map_err(|e| e.to_string())?;
                polygon.add_ring(square("hole", false, 1.0, 2.0)).map_err(|e| e.to_string())?;
            }
            Scenario::ConcaveL => {
                let outline = ring(
                    "outer",
                    true,
                    &[
                        [0.0, 0.0, 0.0],
                        [2.0, 0.0, 0.0],
                        [2.0, 1.0, 0.0],
                        [1.0, 1.0, 0.0],
                        [1.0, 2.0, 0.0],
                        [0.0, 2.0, 0.0],
                    ],
                );
                polygon.add_ring(outline).map_err(|e| e.to_string())?;
            }
            Scenario::TexturedSquare => {
                // Repeated closing point, removed again by the optimize step.
                let outline = ring(
                    "outer",
                    true,
                    &[
                        [0.0, 0.0, 0.0],
                        [1.0, 0.0, 0.0],
                        [1.0, 1.0, 0.0],
                        [0.0, 1.0, 0.0],
                        [0.0, 0.0, 0.0],
                    ],
                );
                polygon.add_ring(outline).map_err(|e| e.to_string())?;

                let texture = Arc::new(Texture::new("facade", "facade.jpg").with_theme(TEXTURE_THEME));
                let coords = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]
                    .into_iter()
                    .map(|[u, v]| TexCoord::new(u, v))
                    .collect();
                polygon.appearance_target_mut().add_texture_target_definition(
                    TextureTargetDefinition::new(scenario.name(), texture)
                        .with_coordinates(TextureCoordinates::new("outer-uv", "outer", coords)),
                );
                theme = Some(TEXTURE_THEME);
            }
        }
        Ok((polygon, theme))
    }

    fn run_scenario(scenario: Scenario, options: BuildOptions) -> Result<ScenarioOutput, String> {
        let recorder = Arc::new(RecordingLogger::new());
        let logger: Arc<dyn CityGmlLogger> = recorder.clone();

        let (mut polygon, theme) = build_polygon(scenario, &logger)?;
        let mut ctx = BuildContext::with_options(options).with_logger(logger);
        polygon.finish_with_context(&mut ctx).map_err(|e| e.to_string())?;

        Ok(ScenarioOutput {
            name: scenario.name(),
            mesh: polygon.to_mesh(theme, true),
            diagnostics: polygon.diagnostics().clone(),
            log: recorder
                .records()
                .into_iter()
                .map(|record| (record.level, record.message))
                .collect(),
        })
    }

    struct Args {
        args: Vec<String>,
        pos: usize,
    }

    impl Args {
        fn new(args: Vec<String>) -> Self {
            Self { args, pos: 0 }
        }

        fn next(&mut self) -> Option<String> {
            let arg = self.args.get(self.pos)?.clone();
            self.pos += 1;
            Some(arg)
        }

        fn value(&mut self, flag: &str) -> Result<String, String> {
            self.next().ok_or_else(|| format!("missing value for {flag}"))
        }
    }
}
