use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use qpanel::app::StructurePanel;
use qpanel::services::{JsonFileProvider, PanelConfig, SampleProvider, SurveyProvider};
use qpanel::ui::InputEvent;
use ratatui::prelude::*;
use std::path::PathBuf;
use std::time::Duration;
use std::{env, io};

fn main() -> io::Result<()> {
    let _logging = qpanel::logging::init();

    // 问卷数据：命令行给 JSON 路径，否则用内置示例。
    let provider: Box<dyn SurveyProvider> = match env::args().nth(1) {
        Some(path) => Box::new(JsonFileProvider::new(PathBuf::from(path))),
        None => Box::new(SampleProvider),
    };
    // 模板：环境变量优先，其次工作目录下的默认模板，都没有就内置全量。
    let template_path = env::var_os("QPANEL_TEMPLATE")
        .map(PathBuf::from)
        .or_else(|| {
            let default = PathBuf::from("assets/panel.json");
            default.exists().then_some(default)
        });

    let mut panel =
        match StructurePanel::load(template_path.as_deref(), provider.as_ref(), PanelConfig::default()) {
            Ok(panel) => panel,
            Err(e) => {
                eprintln!("qpanel: {}", e);
                std::process::exit(1);
            }
        };

    // 持久化协作方的占位：把结构事件落到日志里。
    let events = panel.subscribe();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut panel, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    panel: &mut StructurePanel,
    events: &std::sync::mpsc::Receiver<qpanel::runtime::StructureEvent>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| panel.render(f))?;

        if crossterm::event::poll(Duration::from_millis(100))? {
            let input: InputEvent = crossterm::event::read()?.into();
            if panel.handle_input(&input).is_quit() {
                return Ok(());
            }
        }

        while let Ok(event) = events.try_recv() {
            tracing::debug!(?event, "structure event");
        }
    }
}
