//! Logic Lab - CLI Entry Point
//!
//! Commands:
//! - `logic-lab run <program>` - Run an image or ASM file on the lab CPU
//! - `logic-lab asm <source>` - Assemble to a program image
//! - `logic-lab disasm <image>` - Disassemble a program image
//! - `logic-lab demo` - Step through the built-in 9 + 8 program
//! - `logic-lab truth-table <component>` - Print a component's behaviour
//! - `logic-lab test` - Built-in self-test

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{event, Level};
use tracing_subscriber::prelude::*;

use logiclab::combinational::{full_add, mux4, segments_for, Adder4Bit, Decoder3To8, Encoder8To3, Segment};
use logiclab::cpu::{demo, Cpu, Flag, Register};
use logiclab::sequential::{
    Clocked, CountMode, Counter4Bit, JkAction, JkFlipFlop, NandSrLatch, NorSrLatch, Sequential,
    ShiftRegister4Bit, TFlipFlop,
};
use logiclab::signal::{bit_char, format_msb_first, lsb_first_bits};
use logiclab::{assemble, disassemble, load_image, save_image, Byte, InputPolicy, LabConfig, Nibble};

#[derive(Parser)]
#[command(name = "logic-lab")]
#[command(author = "Yigit")]
#[command(version = "0.1.0")]
#[command(about = "A digital logic laboratory with a 4-bit teaching CPU")]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    /// Refuse out-of-range data instead of masking it
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a program until it halts
    Run {
        /// Path to the image or ASM file to execute
        program: String,
        /// Maximum number of cycles to run (default from config: 1000)
        #[arg(short, long)]
        max_cycles: Option<u64>,
        /// Show trace output
        #[arg(short, long)]
        trace: bool,
    },
    /// Assemble source to a program image
    Asm {
        /// Path to the source file
        source: String,
        /// Output image file
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Disassemble a program image to readable text
    Disasm {
        /// Path to the image file
        image: String,
    },
    /// Step through the built-in demo program
    Demo {
        /// Print the final CPU state as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the truth table or state sequence of a component
    TruthTable {
        #[arg(value_enum)]
        component: Component,
    },
    /// Run the built-in self-test
    Test,
}

#[derive(Clone, Copy, ValueEnum)]
enum Component {
    FullAdder,
    Mux4,
    Decoder,
    Encoder,
    SrNor,
    SrNand,
    Jk,
    T,
    Counter,
    Shift,
    Segments,
}

fn main() {
    let cli = Cli::parse();

    // See
    // https://docs.rs/tracing-subscriber/0.3/tracing_subscriber/filter/struct.EnvFilter.html
    // for how to select which trace messages get printed.
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);
    let filter_layer = match tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info"))
    {
        Err(e) => {
            eprintln!("❌ Invalid log filter: {}", e);
            std::process::exit(1);
        }
        Ok(layer) => layer,
    };
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    let config = load_config(cli.config.as_deref(), cli.strict);

    match cli.command {
        Some(Commands::Run { program, max_cycles, trace }) => {
            run_program(&program, &config, max_cycles.unwrap_or(config.max_cycles), trace);
        }
        Some(Commands::Asm { source, output }) => {
            assemble_file(&source, output);
        }
        Some(Commands::Disasm { image }) => {
            disassemble_file(&image);
        }
        Some(Commands::Demo { json }) => {
            run_demo(&config, json);
        }
        Some(Commands::TruthTable { component }) => {
            print_truth_table(component);
        }
        Some(Commands::Test) => {
            run_self_test();
        }
        None => {
            println!("Logic Lab v0.1.0");
            println!("Gates, latches, flip-flops and a 4-bit CPU");
            println!();
            println!("Use --help for available commands");
        }
    }
}

/// Defaults, then the config file, then the environment, then flags.
fn load_config(path: Option<&str>, strict: bool) -> LabConfig {
    let mut config = match path {
        Some(path) => match LabConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load config {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => LabConfig::default(),
    };

    if let Err(e) = config.apply_env_overrides() {
        eprintln!("❌ Bad environment override: {}", e);
        std::process::exit(1);
    }

    if strict {
        config.policy = InputPolicy::Strict;
    }
    event!(Level::DEBUG, "Effective configuration: {:?}", config);
    config
}

/// Read a program: `.asm` files are assembled, anything else is an image.
fn read_program(path: &str) -> Vec<Byte> {
    if path.ends_with(".asm") {
        let source = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("❌ Failed to read file: {}", e);
                std::process::exit(1);
            }
        };

        match assemble(&source) {
            Ok(words) => {
                println!("📝 Assembled {} words", words.len());
                words
            }
            Err(e) => {
                eprintln!("❌ Assembly error: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        match load_image(path) {
            Ok(words) => {
                println!("📂 Loaded {} words", words.len());
                words
            }
            Err(e) => {
                eprintln!("❌ Failed to load image: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn run_program(path: &str, config: &LabConfig, max_cycles: u64, trace: bool) {
    println!("🔧 Running: {} ({} input policy)", path, config.policy);

    let words = read_program(path);
    if words.is_empty() {
        eprintln!("❌ No instructions to execute");
        std::process::exit(1);
    }

    let mut cpu = Cpu::with_policy(config.policy);
    let bytes: Vec<u8> = words.iter().map(|b| b.value()).collect();
    match cpu.load_program(&bytes, 0) {
        Ok(report) if report.truncated() => {
            println!("⚠️  {} words did not fit and were dropped", report.dropped);
        }
        Ok(_) => {}
        Err(e) => {
            eprintln!("❌ Failed to load program: {}", e);
            std::process::exit(1);
        }
    }

    println!();
    println!("━━━ Execution ━━━");

    let mut cycles = 0u64;
    while cycles < max_cycles {
        let pc = cpu.register_value(Register::Pc);
        let Some(instr) = cpu.step() else { break };
        cycles += 1;

        if trace {
            println!("{:X}: {:<6} AC={:2} Z={} C={}",
                pc,
                Cpu::disassemble(Byte::from(cpu.register_value(Register::Ir))),
                cpu.register_value(Register::Ac),
                bit_char(cpu.flag_value(Flag::Z)),
                bit_char(cpu.flag_value(Flag::C)));
        }
        if let Some(value) = cpu.take_last_output() {
            println!("OUT {} ({})", value.value(), value);
        }
        event!(Level::TRACE, "Executed {:?}", instr);
    }

    println!();
    println!("━━━ Result ━━━");
    print_cpu_state(&cpu);

    if !cpu.is_halted() && cycles >= max_cycles {
        println!();
        println!("⚠️  Reached max cycles limit ({}). Use --max-cycles to increase.", max_cycles);
    }
}

fn print_cpu_state(cpu: &Cpu) {
    println!("Cycles: {}", cpu.cycles());
    println!("Halted: {}", cpu.is_halted());
    for reg in Register::ALL {
        let value = cpu.register_value(reg);
        let bits: Vec<bool> = (0..reg.width()).map(|i| value >> i & 1 == 1).collect();
        println!("{:<4} {} ({})", reg.name(), format_msb_first(&bits), value);
    }
    for flag in Flag::ALL {
        println!("{:<4} {}", flag.name(), bit_char(cpu.flag_value(flag)));
    }
}

fn assemble_file(source_path: &str, output: Option<String>) {
    let out_path = output.unwrap_or_else(|| {
        source_path.strip_suffix(".asm").unwrap_or(source_path).to_string() + ".img"
    });

    println!("📝 Assembling: {} → {}", source_path, out_path);

    let source = match std::fs::read_to_string(source_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("❌ Failed to read file: {}", e);
            std::process::exit(1);
        }
    };

    let words = match assemble(&source) {
        Ok(words) => words,
        Err(e) => {
            eprintln!("❌ Assembly error: {}", e);
            std::process::exit(1);
        }
    };

    println!("✓ Assembled {} words", words.len());

    if let Err(e) = save_image(&out_path, &words) {
        eprintln!("❌ Failed to save image: {}", e);
        std::process::exit(1);
    }

    println!("✓ Saved to {}", out_path);
}

fn disassemble_file(image_path: &str) {
    println!("📖 Disassembling: {}", image_path);
    println!();

    let words = match load_image(image_path) {
        Ok(words) => words,
        Err(e) => {
            eprintln!("❌ Failed to load image: {}", e);
            std::process::exit(1);
        }
    };

    println!("{}", disassemble(&words));
}

fn run_demo(config: &LabConfig, json: bool) {
    let mut cpu = Cpu::with_policy(config.policy);
    if let Err(e) = demo::load_demo(&mut cpu) {
        eprintln!("❌ Failed to load demo: {}", e);
        std::process::exit(1);
    }

    println!("━━━ Demo: M[E] = 9, M[F] = 8 ━━━");
    println!("{}", disassemble(&cpu.memory_state()[..demo::DEMO_PROGRAM.len()]));

    let mut step: u64 = 1;
    while step <= config.max_cycles && cpu.step().is_some() {
        println!("Step {}: {}", step, cpu.last_action_description());
        if let Some(value) = cpu.take_last_output() {
            println!("        output → {}", value.value());
        }
        step += 1;
    }

    println!();
    if json {
        match serde_json::to_string_pretty(&cpu.snapshot()) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("❌ Failed to serialize state: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        print_cpu_state(&cpu);
    }
}

fn print_truth_table(component: Component) {
    match component {
        Component::FullAdder => {
            println!("A B Cin | S Cout");
            for n in 0..8u32 {
                let [a, b, cin] = lsb_first_bits::<3>(n);
                let (sum, carry) = full_add(a, b, cin);
                println!("{} {}  {}  | {}  {}",
                    bit_char(a), bit_char(b), bit_char(cin), bit_char(sum), bit_char(carry));
            }
        }
        Component::Mux4 => {
            println!("S1 S0 | Y (data = 0110)");
            let data = [false, true, true, false];
            for n in 0..4u32 {
                let select = lsb_first_bits::<2>(n);
                println!(" {}  {} | {}", bit_char(select[1]), bit_char(select[0]), bit_char(mux4(&data, select)));
            }
        }
        Component::Decoder => {
            let decoder = Decoder3To8::new();
            println!("EN A2 A1 A0 | Y7..Y0");
            for (enable, n) in std::iter::once((false, 0u32)).chain((0..8).map(|n| (true, n))) {
                let [a0, a1, a2] = lsb_first_bits::<3>(n);
                let outputs = decoder.outputs(enable, a2, a1, a0);
                println!(" {}  {}  {}  {} | {}",
                    bit_char(enable), bit_char(a2), bit_char(a1), bit_char(a0), format_msb_first(&outputs));
            }
        }
        Component::Encoder => {
            let encoder = Encoder8To3::new();
            println!("Active | Y2 Y1 Y0");
            for line in std::iter::once(None).chain((0..8).map(Some)) {
                let code = encoder.output(true, line);
                let label = line.map_or("none".to_string(), |l| format!("D{}", l));
                println!("{:<6} | {}", label, format_msb_first(&code));
            }
        }
        Component::SrNor => {
            let mut latch = NorSrLatch::new();
            println!("S R | Q Q' | State");
            for (s, r) in [(true, false), (false, false), (false, true), (false, false), (true, true)] {
                let condition = latch.update(s, r);
                println!("{} {} | {} {}  | {:?}",
                    bit_char(s), bit_char(r), bit_char(latch.q()), bit_char(latch.q_not()), condition);
            }
        }
        Component::SrNand => {
            let mut latch = NandSrLatch::new();
            println!("S' R' | Q Q' | State");
            for (s, r) in [(false, true), (true, true), (true, false), (true, true), (false, false)] {
                let condition = latch.update(s, r);
                println!("{}  {}  | {} {}  | {:?}",
                    bit_char(s), bit_char(r), bit_char(latch.q()), bit_char(latch.q_not()), condition);
            }
        }
        Component::Jk => {
            println!("Q J K | Q+ | Action");
            for start in [false, true] {
                for n in 0..4u32 {
                    let [k, j] = lsb_first_bits::<2>(n);
                    let mut ff = JkFlipFlop::new();
                    if start {
                        ff.set_inputs(true, false);
                        ff.tick();
                    }
                    ff.set_inputs(j, k);
                    let action: JkAction = ff.tick();
                    println!("{} {} {} | {}  | {:?}",
                        bit_char(start), bit_char(j), bit_char(k), bit_char(ff.q()), action);
                }
            }
        }
        Component::T => {
            let mut ff = TFlipFlop::new();
            println!("T | Q");
            for t in [true, true, false, true] {
                ff.set_input(t);
                ff.clock();
                println!("{} | {}", bit_char(ff.input()), bit_char(ff.q()));
            }
        }
        Component::Counter => {
            let mut counter = Counter4Bit::new();
            for mode in [CountMode::Up, CountMode::Down] {
                counter.set_mode(mode);
                let mut line = format!("{:<4}", format!("{:?}", mode));
                for _ in 0..16 {
                    counter.clock();
                    line.push_str(&format!(" {:2}", counter.value().value()));
                }
                println!("{}", line);
            }
        }
        Component::Shift => {
            let mut reg = ShiftRegister4Bit::new();
            println!("In | Q0 Q1 Q2 Q3 | Out");
            for bit in [true, false, true, true, false, false, false, false] {
                reg.set_data_input(bit);
                reg.clock();
                let q = reg.bits();
                println!("{}  | {}  {}  {}  {}  | {}",
                    bit_char(bit), bit_char(q[0]), bit_char(q[1]), bit_char(q[2]), bit_char(q[3]),
                    bit_char(reg.serial_out()));
            }
        }
        Component::Segments => {
            println!("N | a b c d e f g");
            for n in 0..10 {
                let digit = segments_for(n);
                let lit: Vec<String> = Segment::ALL.iter().map(|&s| bit_char(digit.is_lit(s)).to_string()).collect();
                println!("{} | {}", n, lit.join(" "));
            }
        }
    }
}

fn run_self_test() {
    println!("━━━ Logic Lab Self-Test ━━━");
    println!();

    let mut passed = 0;
    let mut failed = 0;
    let mut check = |name: &str, ok: bool| {
        print!("{}... ", name);
        if ok { println!("✓"); passed += 1; }
        else { println!("✗"); failed += 1; }
    };

    // Test 1: Full adder truth table
    check("Full adder truth table", (0..8u32).all(|n| {
        let [a, b, cin] = lsb_first_bits::<3>(n);
        let ones = u32::from(a) + u32::from(b) + u32::from(cin);
        full_add(a, b, cin) == (ones & 1 == 1, ones >= 2)
    }));

    // Test 2: Exhaustive 4-bit addition
    let mut adder = Adder4Bit::new();
    check("4-bit adder, all 512 cases", (0..16u8).all(|a| (0..16u8).all(|b| [false, true].iter().all(|&cin| {
        let (sum, carry) = adder.add(Nibble::new(a), Nibble::new(b), cin);
        let total = u32::from(a) + u32::from(b) + u32::from(cin);
        u32::from(sum.value()) == total % 16 && carry == (total > 15)
    }))));

    // Test 3: Counter wraps after 16 clocks
    let mut counter = Counter4Bit::new();
    let seen: Vec<u8> = (0..16).map(|_| { counter.clock(); counter.value().value() }).collect();
    check("Counter counts 1..15 then 0", seen == (1..16).chain(std::iter::once(0)).collect::<Vec<u8>>());

    // Test 4: JK toggle
    let mut jk = JkFlipFlop::new();
    jk.set_inputs(true, true);
    jk.tick();
    let first = jk.q();
    jk.tick();
    check("JK toggles on J=K=1", first && !jk.q());

    // Test 5: NOR latch invalid state
    let mut latch = NorSrLatch::new();
    latch.update(true, true);
    check("NOR latch S=R=1 forces both outputs low", !latch.q() && !latch.q_not());

    // Test 6: CPU demo program
    let mut cpu = Cpu::new();
    let loaded = demo::load_demo(&mut cpu).is_ok();
    cpu.step();
    cpu.step();
    let carry = cpu.flag_value(Flag::C);
    cpu.step();
    let output = cpu.take_last_output();
    cpu.step();
    check("CPU 9 + 8 = 1 carry 1", loaded && carry && output == Some(Nibble::new(1)) && cpu.is_halted());

    // Test 7: Assembler and disassembler agree
    let listing_ok = match assemble("LDA E\nADD F\nSTA 3\nOUT\nHLT") {
        Ok(words) => words.iter().map(|w| Cpu::disassemble(*w)).collect::<Vec<_>>()
            == ["LDA E", "ADD F", "STA 3", "OUT", "HLT"],
        Err(_) => false,
    };
    check("Assembler/disassembler agree", listing_ok);

    println!();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Results: {} passed, {} failed", passed, failed);

    if failed == 0 {
        println!("✓ All tests passed!");
    } else {
        std::process::exit(1);
    }
}
